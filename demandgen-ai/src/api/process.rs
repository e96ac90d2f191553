//! Exhibit processing endpoint
//!
//! POST /api/process (multipart/form-data)
//! - `pdfs`: zero or more files
//! - `existingExhibits`: JSON array of previously returned exhibits
//! - `keepFiles`: JSON array of file names to retain
//! - `reprocessAll`: "true" to rerun analysis over existing exhibits only

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    routing::post,
    Json, Router,
};
use demandgen_common::models::ConsolidatedResponse;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::config::missing_api_key_message;
use crate::error::{ApiError, ApiResult};
use crate::pipeline::ingest::{parse_existing_exhibits, parse_flag, parse_keep_files};
use crate::pipeline::{ProcessRequest, UploadedFile};
use crate::AppState;

const FILES_FIELD: &str = "pdfs";
const EXISTING_FIELD: &str = "existingExhibits";
const KEEP_FIELD: &str = "keepFiles";
const REPROCESS_FIELD: &str = "reprocessAll";

/// POST /api/process
pub async fn process_exhibits(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ConsolidatedResponse>> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("process", %request_id);

    let result = handle_process(&state, multipart).instrument(span).await;

    if let Err(err) = &result {
        warn!(%request_id, error = %err, "Processing request failed");
        state.record_error(err.to_string()).await;
    }

    result.map(Json)
}

async fn handle_process(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ConsolidatedResponse> {
    // Refuse before reading the body
    let pipeline = state
        .pipeline
        .as_ref()
        .ok_or_else(|| ApiError::Configuration(missing_api_key_message()))?;

    let multipart = multipart.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let request = read_form(multipart).await?;

    info!(
        files = request.files.len(),
        existing = request.existing_exhibits.len(),
        reprocess_all = request.reprocess_all,
        "Processing request received"
    );

    let response = pipeline.process(request).await?;

    info!(
        total_exhibits = response.processing_info.total_exhibits,
        errors = response.processing_info.error_exhibits,
        total_expenses = response.total_expenses,
        "Processing complete"
    );

    Ok(response)
}

/// Collect form fields into a pipeline request
async fn read_form(mut multipart: Multipart) -> ApiResult<ProcessRequest> {
    let mut request = ProcessRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            FILES_FIELD => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|n| !n.trim().is_empty());
                let data = field.bytes().await?;

                // Browsers send an empty part for an untouched file input
                match file_name {
                    Some(file_name) if !data.is_empty() => request.files.push(UploadedFile {
                        file_name,
                        data: data.to_vec(),
                    }),
                    _ => tracing::debug!("Ignoring empty file part"),
                }
            }
            EXISTING_FIELD => {
                let text = field.text().await?;
                request.existing_exhibits = parse_existing_exhibits(&text)?;
            }
            KEEP_FIELD => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    request.keep_files = Some(parse_keep_files(&text)?);
                }
            }
            REPROCESS_FIELD => {
                let text = field.text().await?;
                request.reprocess_all = parse_flag(&text);
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
            }
        }
    }

    Ok(request)
}

/// Build processing routes
pub fn process_routes() -> Router<AppState> {
    Router::new().route("/api/process", post(process_exhibits))
}
