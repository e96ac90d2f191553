//! Bootstrap configuration loaded from TOML
//!
//! Resolution order for the TOML file location:
//! 1. Explicit path (command-line `--config`)
//! 2. `DEMANDGEN_CONFIG` environment variable
//! 3. Platform config directory: `<config_dir>/demandgen/<module>.toml`
//!
//! A missing file is not an error. The service logs a warning and starts with
//! compiled defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit TOML file
pub const CONFIG_PATH_ENV: &str = "DEMANDGEN_CONFIG";

/// Bootstrap configuration for a demandgen module
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Interface the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body size (multipart uploads included)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Generative model connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// API key; the `GEMINI_API_KEY` environment variable takes priority
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier, e.g. `gemini-1.5-flash`
    #[serde(default = "default_model_name")]
    pub name: String,

    /// REST endpoint root
    #[serde(default = "default_model_base_url")]
    pub base_url: String,

    /// Per-HTTP-call timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Retry policy wrapped around every model call
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5780
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_model_name() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_model_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    2000
}

fn default_multiplier() -> f64 {
    1.5
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            logging: LoggingConfig::default(),
            model: ModelConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            name: default_model_name(),
            base_url: default_model_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

/// Resolve the TOML file location for `module_name`
///
/// Returns `None` only when no explicit path was given and the platform has
/// no config directory.
pub fn resolve_config_path(cli_path: Option<&Path>, module_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    dirs::config_dir().map(|d| d.join("demandgen").join(format!("{}.toml", module_name)))
}

/// Parse a TOML file into a [`TomlConfig`]
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// File absent at this location; compiled defaults in use
    Missing(PathBuf),
    /// Platform has no config directory; compiled defaults in use
    NoLocation,
}

impl ConfigSource {
    /// Report the outcome through `tracing`; call once a subscriber is installed
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigSource::Missing(path) => warn!(
                "Config file not found at {}, using compiled defaults",
                path.display()
            ),
            ConfigSource::NoLocation => {
                warn!("No configuration directory available, using compiled defaults")
            }
        }
    }
}

/// Load the TOML file if present, falling back to compiled defaults
///
/// A file that exists but fails to parse is an error. Nothing is logged;
/// call [`ConfigSource::log`] once a subscriber is installed.
pub fn load_with_source(path: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    let Some(path) = path else {
        return Ok((TomlConfig::default(), ConfigSource::NoLocation));
    };

    if !path.exists() {
        return Ok((TomlConfig::default(), ConfigSource::Missing(path.to_path_buf())));
    }

    let config = load_toml_config(path)
        .map_err(|e| Error::Config(format!("Failed to load {}: {}", path.display(), e)))?;
    Ok((config, ConfigSource::File(path.to_path_buf())))
}

/// [`load_with_source`] that logs the outcome immediately
pub fn load_or_default(path: Option<&Path>) -> Result<TomlConfig> {
    let (config, source) = load_with_source(path)?;
    source.log();
    Ok(config)
}

/// Validate a secret value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
