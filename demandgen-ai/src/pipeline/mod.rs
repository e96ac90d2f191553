//! Exhibit processing pipeline
//!
//! Stages run strictly downstream:
//! ingestion → extraction → identity aggregation → global analysis →
//! consolidation. Global analysis waits for every extraction to settle.

pub mod analysis;
pub mod coerce;
pub mod consolidate;
pub mod extract;
pub mod identity;
pub mod ingest;
pub mod prompts;

use chrono::Utc;
use demandgen_common::models::{ConsolidatedResponse, Exhibit};
use std::sync::Arc;
use thiserror::Error;

use crate::model::{GenerativeModel, ModelError};
use crate::utils::RetryPolicy;
use consolidate::ConsolidationInput;

/// Pipeline failures surfaced to the caller
///
/// Per-exhibit failures never appear here; they are recorded as error rows.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Nothing to process, or malformed session data
    #[error("{0}")]
    InvalidInput(String),

    /// Case-level analysis could not be produced
    #[error("Global case analysis failed: {0}")]
    GlobalAnalysis(#[source] ModelError),
}

/// One uploaded file
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Input of one processing pass
#[derive(Debug, Clone, Default)]
pub struct ProcessRequest {
    pub files: Vec<UploadedFile>,
    /// Exhibits round-tripped from the caller's session
    pub existing_exhibits: Vec<Exhibit>,
    /// File names the caller still wants; `None` keeps every existing exhibit
    pub keep_files: Option<Vec<String>>,
    pub reprocess_all: bool,
}

/// Runs processing passes against a generative model
#[derive(Clone)]
pub struct ExhibitPipeline {
    model: Arc<dyn GenerativeModel>,
    retry: RetryPolicy,
}

impl ExhibitPipeline {
    pub fn new(model: Arc<dyn GenerativeModel>, retry: RetryPolicy) -> Self {
        Self { model, retry }
    }

    /// Run one full pass
    pub async fn process(
        &self,
        request: ProcessRequest,
    ) -> Result<ConsolidatedResponse, PipelineError> {
        let plan = ingest::plan_ingest(request, Utc::now())?;

        tracing::info!(
            retained = plan.retained.len(),
            new_files = plan.new_files.len(),
            skipped = plan.skipped_files.len(),
            reprocess = plan.reprocess,
            "Ingestion planned"
        );

        let extracted =
            extract::extract_all(self.model.as_ref(), &self.retry, &plan.new_files).await;

        let existing_count = plan.retained.len();
        let new_count = extracted.len();
        let mut exhibits = plan.retained;
        exhibits.extend(extracted);

        // Reduction over settled results, in final exhibit order
        let aggregated =
            identity::aggregate_client_info(exhibits.iter().filter_map(|e| e.client_info.as_ref()));

        let outcome =
            analysis::run_global_analysis(self.model.as_ref(), &self.retry, &exhibits, &aggregated)
                .await?;

        let client_info = identity::apply_overrides(aggregated, outcome.client_info.as_ref());

        Ok(consolidate::consolidate(
            ConsolidationInput {
                exhibits,
                existing_count,
                new_count,
                skipped_count: plan.skipped_files.len(),
                reprocessed: plan.reprocess,
                analysis: outcome.analysis,
                client_info,
            },
            Utc::now(),
        ))
    }
}
