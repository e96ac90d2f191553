//! Exhibit ingestion
//!
//! Decides which uploaded files need extraction and which previously
//! processed exhibits carry forward. File name equality is the only
//! deduplication key: two different documents sharing a name collide and the
//! later one is dropped.

use chrono::{DateTime, Utc};
use demandgen_common::models::Exhibit;
use std::collections::HashSet;

use super::{PipelineError, ProcessRequest, UploadedFile};

/// Outcome of ingestion: what to extract, what to keep
#[derive(Debug, Clone)]
pub struct IngestPlan {
    /// Existing exhibits carried into this pass, in caller order
    pub retained: Vec<Exhibit>,
    /// Uploads that need per-exhibit extraction, in upload order
    pub new_files: Vec<UploadedFile>,
    /// Names of uploads dropped as duplicates (or ignored on reprocess)
    pub skipped_files: Vec<String>,
    /// Reprocess run: no extraction, analysis over retained exhibits only
    pub reprocess: bool,
}

/// Parse the `existingExhibits` form field
pub fn parse_existing_exhibits(raw: &str) -> Result<Vec<Exhibit>, PipelineError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
        .map_err(|e| PipelineError::InvalidInput(format!("existingExhibits is not valid JSON: {}", e)))
}

/// Parse the `keepFiles` form field
pub fn parse_keep_files(raw: &str) -> Result<Vec<String>, PipelineError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
        .map_err(|e| PipelineError::InvalidInput(format!("keepFiles is not valid JSON: {}", e)))
}

/// Parse a boolean-as-string form field ("true"/"1", case-insensitive)
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

/// Split a request into retained exhibits and files to extract
pub fn plan_ingest(request: ProcessRequest, now: DateTime<Utc>) -> Result<IngestPlan, PipelineError> {
    let ProcessRequest {
        files,
        existing_exhibits,
        keep_files,
        reprocess_all,
    } = request;

    if reprocess_all {
        if existing_exhibits.is_empty() {
            return Err(PipelineError::InvalidInput(
                "No existing exhibits to reprocess".to_string(),
            ));
        }

        let skipped_files: Vec<String> = files.into_iter().map(|f| f.file_name).collect();
        if !skipped_files.is_empty() {
            tracing::warn!(
                ignored = skipped_files.len(),
                "Uploaded files ignored during reprocess run"
            );
        }

        let retained = existing_exhibits
            .into_iter()
            .map(|mut exhibit| {
                exhibit.mark_reprocessed(now);
                exhibit
            })
            .collect();

        return Ok(IngestPlan {
            retained,
            new_files: Vec::new(),
            skipped_files,
            reprocess: true,
        });
    }

    let retained: Vec<Exhibit> = match keep_files {
        Some(keep) => {
            let keep: HashSet<&str> = keep.iter().map(String::as_str).collect();
            existing_exhibits
                .into_iter()
                .filter(|e| {
                    let kept = keep.contains(e.file_name.as_str());
                    if !kept {
                        tracing::debug!(file_name = %e.file_name, "Dropping exhibit removed by caller");
                    }
                    kept
                })
                .collect()
        }
        None => existing_exhibits,
    };

    let mut seen: HashSet<String> = retained.iter().map(|e| e.file_name.clone()).collect();
    let mut new_files = Vec::new();
    let mut skipped_files = Vec::new();

    for file in files {
        if seen.insert(file.file_name.clone()) {
            new_files.push(file);
        } else {
            tracing::info!(file_name = %file.file_name, "Skipping already processed file");
            skipped_files.push(file.file_name);
        }
    }

    if new_files.is_empty() && retained.is_empty() {
        return Err(PipelineError::InvalidInput(
            "No PDF files uploaded and no existing exhibits to process".to_string(),
        ));
    }

    Ok(IngestPlan {
        retained,
        new_files,
        skipped_files,
        reprocess: false,
    })
}
