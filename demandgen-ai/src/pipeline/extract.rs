//! Per-exhibit extraction
//!
//! One model call per new file, all dispatched concurrently. Each call
//! settles into an [`Exhibit`]: failures become `isError` rows so one bad
//! document never aborts its siblings.

use chrono::{DateTime, Utc};
use demandgen_common::models::Exhibit;
use futures::future::join_all;
use sha2::{Digest, Sha256};
use std::time::Instant;

use super::coerce::{coerce_amount, coerce_client_info, coerce_text, field};
use super::prompts::EXTRACTION_PROMPT;
use super::UploadedFile;
use crate::model::response::parse_json_object;
use crate::model::{Attachment, GenerativeModel, ModelError};
use crate::utils::{retry_with_backoff, RetryPolicy};

const DEFAULT_SUMMARY: &str = "No summary available.";

/// Soft identity signal from name, size and processing time
///
/// Multipart uploads carry no modification time, so the processing instant
/// stands in for it. Two uploads of the same file therefore hash differently;
/// nothing relies on this value for deduplication.
pub fn file_hash(file_name: &str, size: usize, at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_name.as_bytes());
    hasher.update(size.to_le_bytes());
    hasher.update(at.timestamp_millis().to_le_bytes());
    let digest = hasher.finalize();
    digest[..8].iter().map(|b| format!("{:02x}", b)).collect()
}

/// Build an exhibit from raw model output
pub fn exhibit_from_response(
    file_name: &str,
    file_hash: String,
    raw: &str,
    processed_at: DateTime<Utc>,
) -> Result<Exhibit, ModelError> {
    let map = parse_json_object(raw)?;

    let heading = coerce_text(field(&map, &["heading", "title"]))
        .unwrap_or_else(|| format!("Exhibit: {}", file_name));
    let summary =
        coerce_text(field(&map, &["summary"])).unwrap_or_else(|| DEFAULT_SUMMARY.to_string());

    Ok(Exhibit {
        file_name: file_name.to_string(),
        heading,
        summary,
        expenses: coerce_amount(field(&map, &["expenses", "amount", "total"])),
        client_info: coerce_client_info(field(&map, &["clientInfo"])),
        processed_at,
        file_hash,
        is_error: false,
        reprocessed: false,
        reprocessed_at: None,
    })
}

/// Run extraction for one file; never fails, errors become `isError` rows
pub async fn extract_exhibit(
    model: &dyn GenerativeModel,
    policy: &RetryPolicy,
    file: &UploadedFile,
) -> Exhibit {
    let started = Instant::now();
    let processed_at = Utc::now();
    let hash = file_hash(&file.file_name, file.data.len(), processed_at);
    let attachment = Attachment::pdf(file.data.clone());

    let outcome = retry_with_backoff(
        "exhibit extraction",
        policy,
        ModelError::is_transient,
        || model.generate(EXTRACTION_PROMPT, Some(&attachment)),
    )
    .await
    .and_then(|raw| exhibit_from_response(&file.file_name, hash.clone(), &raw, processed_at));

    match outcome {
        Ok(exhibit) => {
            tracing::info!(
                file_name = %file.file_name,
                expenses = exhibit.expenses,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Exhibit extracted"
            );
            exhibit
        }
        Err(e) => {
            tracing::error!(
                file_name = %file.file_name,
                error = %e,
                "Exhibit extraction failed"
            );
            Exhibit::failed(file.file_name.clone(), hash, &e.to_string())
        }
    }
}

/// Extract every file concurrently and settle all before returning
///
/// Output order matches input order regardless of completion order.
pub async fn extract_all(
    model: &dyn GenerativeModel,
    policy: &RetryPolicy,
    files: &[UploadedFile],
) -> Vec<Exhibit> {
    if files.is_empty() {
        return Vec::new();
    }

    tracing::info!(count = files.len(), model = model.name(), "Extracting new exhibits");

    join_all(files.iter().map(|file| extract_exhibit(model, policy, file))).await
}
