//! Error types for demandgen-ai
//!
//! Every failure response has the body `{ "error": string, "details"?: string }`.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::pipeline::PipelineError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Service not configured, e.g. missing model API key (500)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Multipart body could not be read (400)
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    /// Processing pipeline failure
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, String, Option<String>) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Service configuration error".to_string(),
                Some(msg.clone()),
            ),
            ApiError::Multipart(err) => (
                err.status(),
                "Invalid multipart request".to_string(),
                Some(err.body_text()),
            ),
            ApiError::Pipeline(PipelineError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone(), None)
            }
            ApiError::Pipeline(PipelineError::GlobalAnalysis(err)) => (
                StatusCode::BAD_GATEWAY,
                "Failed to generate case analysis".to_string(),
                Some(err.to_string()),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = self.parts();

        let body = match details {
            Some(details) => json!({ "error": error, "details": details }),
            None => json!({ "error": error }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Configuration("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::Pipeline(PipelineError::InvalidInput("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Pipeline(PipelineError::GlobalAnalysis(ModelError::RateLimited)),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_global_failure_carries_details() {
        let (_, error, details) =
            ApiError::Pipeline(PipelineError::GlobalAnalysis(ModelError::Api(500, "boom".into())))
                .parts();

        assert_eq!(error, "Failed to generate case analysis");
        assert_eq!(details.as_deref(), Some("API error 500: boom"));
    }
}
