//! demandgen-ai library interface
//!
//! Exposes the router, application state and pipeline for the binary and
//! for integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod letter;
pub mod model;
pub mod pipeline;
pub mod utils;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::letter::{DocumentRenderer, PleadingPaperRenderer};
use crate::pipeline::ExhibitPipeline;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Processing pipeline; `None` while no model API key is configured
    pub pipeline: Option<ExhibitPipeline>,
    /// Letter export format
    pub renderer: Arc<dyn DocumentRenderer>,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(pipeline: Option<ExhibitPipeline>, max_upload_bytes: usize) -> Self {
        Self {
            pipeline,
            renderer: Arc::new(PleadingPaperRenderer::default()),
            max_upload_bytes,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Remember the most recent failure for the health endpoint
    pub async fn record_error(&self, message: String) {
        *self.last_error.write().await = Some(message);
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(api::process_routes())
        .merge(api::letter_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
