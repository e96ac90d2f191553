//! Generative model collaborator
//!
//! The pipeline only needs one capability from the model: submit a prompt and
//! an optional inline document, get raw text back. The text is expected to
//! contain a JSON object but nothing enforces it; callers parse defensively
//! with [`response::parse_json_object`].

pub mod gemini;
pub mod response;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

/// Generative model errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ModelError {
    /// Whether another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ModelError::Network(_) | ModelError::RateLimited | ModelError::EmptyResponse => true,
            ModelError::Api(status, _) => *status >= 500,
            ModelError::Parse(_) => false,
        }
    }
}

/// Binary document sent alongside a prompt
#[derive(Debug, Clone)]
pub struct Attachment {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn pdf(data: Vec<u8>) -> Self {
        Self {
            mime_type: "application/pdf".to_string(),
            data,
        }
    }
}

/// Text generation backend
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model identifier for logging
    fn name(&self) -> &str;

    /// Submit a prompt (and optional document) and return the raw response text
    async fn generate(
        &self,
        prompt: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, ModelError>;
}
