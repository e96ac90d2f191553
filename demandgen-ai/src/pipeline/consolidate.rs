//! Result consolidation
//!
//! Pure aggregation of the pass into one [`ConsolidatedResponse`]. Nothing
//! here can fail.

use chrono::{DateTime, Utc};
use demandgen_common::models::{
    AggregatedClientInfo, ConsolidatedResponse, Exhibit, GlobalAnalysis, ProcessingInfo,
};

/// Everything one pass produced, ready to merge
#[derive(Debug, Clone)]
pub struct ConsolidationInput {
    /// Retained exhibits followed by newly extracted ones
    pub exhibits: Vec<Exhibit>,
    pub existing_count: usize,
    pub new_count: usize,
    pub skipped_count: usize,
    pub reprocessed: bool,
    pub analysis: GlobalAnalysis,
    pub client_info: AggregatedClientInfo,
}

/// Sum of exhibit expenses; error exhibits contribute 0
pub fn total_expenses(exhibits: &[Exhibit]) -> f64 {
    exhibits
        .iter()
        .map(|e| if e.is_error { 0.0 } else { e.expenses })
        .sum()
}

/// Merge a pass into the response returned to the caller
pub fn consolidate(input: ConsolidationInput, now: DateTime<Utc>) -> ConsolidatedResponse {
    let error_exhibits = input.exhibits.iter().filter(|e| e.is_error).count();

    let processing_info = ProcessingInfo {
        total_exhibits: input.exhibits.len(),
        existing_exhibits: input.existing_count,
        new_exhibits: input.new_count,
        error_exhibits,
        skipped_files: input.skipped_count,
        reprocessed: input.reprocessed,
        processed_at: now,
    };

    ConsolidatedResponse {
        success: true,
        total_expenses: total_expenses(&input.exhibits),
        exhibits: input.exhibits,
        global_analysis: input.analysis,
        client_info: input.client_info,
        processing_info,
    }
}
