//! Unit tests for TOML bootstrap configuration
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate DEMANDGEN_CONFIG are marked with #[serial].

use demandgen_common::config::{
    is_valid_key, load_or_default, load_toml_config, load_with_source, resolve_config_path,
    ConfigSource, TomlConfig, CONFIG_PATH_ENV,
};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let config = TomlConfig::default();

    assert_eq!(config.bind_address, "127.0.0.1");
    assert_eq!(config.port, 5780);
    assert_eq!(config.logging.level, "info");
    assert!(config.model.api_key.is_none());
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.initial_delay_ms, 2000);
    assert_eq!(config.retry.multiplier, 1.5);
}

#[test]
fn test_partial_file_fills_defaults() {
    let file = write_config(
        r#"
port = 6000

[model]
api_key = "secret"

[retry]
max_attempts = 5
"#,
    );

    let config = load_toml_config(file.path()).unwrap();

    assert_eq!(config.port, 6000);
    assert_eq!(config.bind_address, "127.0.0.1");
    assert_eq!(config.model.api_key.as_deref(), Some("secret"));
    assert_eq!(config.model.name, "gemini-1.5-flash");
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.initial_delay_ms, 2000);
}

#[test]
fn test_missing_file_uses_defaults() {
    let config = load_or_default(Some(Path::new("/nonexistent/demandgen/none.toml"))).unwrap();
    assert_eq!(config.port, 5780);
}

#[test]
fn test_load_reports_source() {
    let missing = Path::new("/nonexistent/demandgen/none.toml");
    let (config, source) = load_with_source(Some(missing)).unwrap();
    assert_eq!(config.port, 5780);
    assert_eq!(source, ConfigSource::Missing(missing.to_path_buf()));

    let (_, source) = load_with_source(None).unwrap();
    assert_eq!(source, ConfigSource::NoLocation);

    let file = write_config("port = 7000");
    let (config, source) = load_with_source(Some(file.path())).unwrap();
    assert_eq!(config.port, 7000);
    assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
}

#[test]
fn test_malformed_file_is_an_error() {
    let file = write_config("port = \"not a number\"");
    assert!(load_or_default(Some(file.path())).is_err());
}

#[test]
#[serial]
fn test_cli_path_beats_environment() {
    env::set_var(CONFIG_PATH_ENV, "/tmp/from-env.toml");

    let resolved = resolve_config_path(Some(Path::new("/tmp/from-cli.toml")), "demandgen-ai");
    assert_eq!(resolved, Some(PathBuf::from("/tmp/from-cli.toml")));

    env::remove_var(CONFIG_PATH_ENV);
}

#[test]
#[serial]
fn test_environment_path_used_without_cli() {
    env::set_var(CONFIG_PATH_ENV, "/tmp/from-env.toml");

    let resolved = resolve_config_path(None, "demandgen-ai");
    assert_eq!(resolved, Some(PathBuf::from("/tmp/from-env.toml")));

    env::remove_var(CONFIG_PATH_ENV);
}

#[test]
#[serial]
fn test_platform_default_is_module_named() {
    env::remove_var(CONFIG_PATH_ENV);

    if let Some(path) = resolve_config_path(None, "demandgen-ai") {
        assert!(path.ends_with("demandgen/demandgen-ai.toml"));
    }
}

#[test]
fn test_key_validation() {
    assert!(is_valid_key("abc"));
    assert!(!is_valid_key(""));
    assert!(!is_valid_key("   "));
}
