//! demandgen-ai - Exhibit processing microservice
//!
//! Accepts exhibit documents for a personal-injury claim, extracts a summary
//! and billed expenses from each with a generative model, resolves the
//! client identity across exhibits and produces one case-level analysis.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use demandgen_ai::config::{load_config, resolve_api_key, Args};
use demandgen_ai::model::GeminiClient;
use demandgen_ai::pipeline::ExhibitPipeline;
use demandgen_ai::utils::RetryPolicy;
use demandgen_ai::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is needed before logging to pick the default level
    let (config, config_source) = load_config(&args).context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.logging.level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting demandgen-ai (Exhibit Processing) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("DEMANDGEN_GIT_REV"),
        env!("DEMANDGEN_BUILT_AT"),
        env!("DEMANDGEN_PROFILE")
    );

    config_source.log();

    let pipeline = match resolve_api_key(&config) {
        Some(api_key) => {
            let client = GeminiClient::new(api_key, &config.model)
                .context("Failed to initialize model client")?;
            info!("Model: {}", config.model.name);
            Some(ExhibitPipeline::new(
                Arc::new(client),
                RetryPolicy::from_config(&config.retry),
            ))
        }
        None => {
            warn!("Model API key not configured; /api/process will return configuration errors");
            None
        }
    };

    let state = AppState::new(pipeline, config.max_upload_bytes);
    let app = build_router(state);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
