//! Letter export endpoint
//!
//! POST /api/letter/export renders a consolidated response as a demand
//! letter document and returns it as a download.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use demandgen_common::models::ConsolidatedResponse;
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::letter::{LetterOptions, LetterOutline};
use crate::AppState;

/// Export request body
#[derive(Debug, Deserialize)]
pub struct ExportLetterRequest {
    /// Response previously returned by /api/process
    pub letter: ConsolidatedResponse,
    #[serde(default)]
    pub options: LetterOptions,
}

/// POST /api/letter/export
pub async fn export_letter(
    State(state): State<AppState>,
    payload: Result<Json<ExportLetterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let outline = LetterOutline::from_response(&request.letter, &request.options);
    let body = state.renderer.render(&outline);

    info!(
        exhibits = request.letter.exhibits.len(),
        bytes = body.len(),
        "Letter exported"
    );

    let disposition = format!("attachment; filename=\"{}\"", state.renderer.file_name());

    Ok((
        [
            (header::CONTENT_TYPE, state.renderer.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// Build letter routes
pub fn letter_routes() -> Router<AppState> {
    Router::new().route("/api/letter/export", post(export_letter))
}
