//! Global case analysis
//!
//! One model call over every non-error exhibit summary. Unlike extraction
//! there is no degraded result: exhausting retries or receiving unparseable
//! output fails the whole request.

use demandgen_common::models::{AggregatedClientInfo, ClientInfo, Exhibit, GlobalAnalysis};

use super::coerce::{coerce_client_info, coerce_damages, coerce_string_list, coerce_text, field};
use super::prompts::build_analysis_prompt;
use super::PipelineError;
use crate::model::response::parse_json_object;
use crate::model::{GenerativeModel, ModelError};
use crate::utils::{retry_with_backoff, RetryPolicy};

/// Parsed analysis plus the identity the model reported alongside it
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub analysis: GlobalAnalysis,
    /// Embedded `clientInfo`, removed from the analysis itself
    pub client_info: Option<ClientInfo>,
}

/// Coerce raw model output into a [`GlobalAnalysis`]
pub fn analysis_from_response(raw: &str) -> Result<AnalysisOutcome, ModelError> {
    let mut map = parse_json_object(raw)?;

    let client_info = coerce_client_info(map.remove("clientInfo").as_ref());

    let analysis = GlobalAnalysis {
        claim_description: coerce_text(field(&map, &["claimDescription", "claim", "description"]))
            .unwrap_or_default(),
        liability: coerce_text(field(&map, &["liability"])).unwrap_or_default(),
        injuries: coerce_string_list(field(&map, &["injuries"])),
        facts: coerce_text(field(&map, &["facts", "factsOfLoss"])).unwrap_or_default(),
        damages: coerce_damages(field(&map, &["damages"])),
    };

    Ok(AnalysisOutcome {
        analysis,
        client_info,
    })
}

/// Run the case-level model call
pub async fn run_global_analysis(
    model: &dyn GenerativeModel,
    policy: &RetryPolicy,
    exhibits: &[Exhibit],
    known: &AggregatedClientInfo,
) -> Result<AnalysisOutcome, PipelineError> {
    let prompt = build_analysis_prompt(exhibits, known);

    tracing::info!(
        exhibit_count = exhibits.iter().filter(|e| !e.is_error).count(),
        prompt_chars = prompt.len(),
        "Running global case analysis"
    );

    let raw = retry_with_backoff(
        "global case analysis",
        policy,
        ModelError::is_transient,
        || model.generate(&prompt, None),
    )
    .await
    .map_err(PipelineError::GlobalAnalysis)?;

    let outcome = analysis_from_response(&raw).map_err(PipelineError::GlobalAnalysis)?;

    tracing::info!(
        injuries = outcome.analysis.injuries.len(),
        total_demand = outcome.analysis.damages.total_demand(),
        "Global case analysis complete"
    );

    Ok(outcome)
}
