//! Configuration resolution for demandgen-ai
//!
//! Priority: command line → environment → TOML → compiled defaults.
//! The model API key comes from `GEMINI_API_KEY` or the TOML `[model]`
//! table; without one the service still starts, but every processing request
//! fails with a configuration error before any work is done.

use clap::Parser;
use demandgen_common::config::{
    is_valid_key, load_with_source, resolve_config_path, ConfigSource, TomlConfig,
};
use demandgen_common::Result;
use std::path::PathBuf;
use tracing::{info, warn};

/// Module name used for the default TOML file location
pub const MODULE_NAME: &str = "demandgen-ai";

/// Environment variable carrying the model API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Command-line arguments for demandgen-ai
#[derive(Parser, Debug, Default)]
#[command(name = "demandgen-ai")]
#[command(about = "Exhibit processing service for demand letters")]
#[command(version)]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long, env = "DEMANDGEN_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "DEMANDGEN_PORT")]
    pub port: Option<u16>,
}

/// Load TOML configuration and apply command-line overrides
///
/// Logs nothing: the returned [`ConfigSource`] is reported by the caller once
/// tracing is initialized.
pub fn load_config(args: &Args) -> Result<(TomlConfig, ConfigSource)> {
    let path = resolve_config_path(args.config.as_deref(), MODULE_NAME);
    let (mut config, source) = load_with_source(path.as_deref())?;

    if let Some(bind_address) = &args.bind_address {
        config.bind_address = bind_address.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    Ok((config, source))
}

/// Resolve the model API key
///
/// **Priority:** ENV → TOML
pub fn resolve_api_key(config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(API_KEY_ENV).ok().filter(|k| is_valid_key(k));
    let toml_key = config.model.api_key.clone().filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "Model API key found in both {} and TOML config. Using environment variable.",
            API_KEY_ENV
        );
    }

    if let Some(key) = env_key {
        info!("Model API key loaded from environment variable");
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("Model API key loaded from TOML config");
        return Some(key);
    }

    None
}

/// Remediation text returned while no API key is configured
pub fn missing_api_key_message() -> String {
    format!(
        "Generative model API key not configured. Configure using one of:\n\
         1. Environment: {}=your-key-here\n\
         2. TOML config: [model] api_key = \"your-key\" in {}.toml\n\
         then restart the service.",
        API_KEY_ENV, MODULE_NAME
    )
}
