//! Configuration loading and setting resolution tests
//!
//! Tests that touch RAGA_BGM_* / GEMINI_API_KEY are marked #[serial] so the
//! environment is not mutated concurrently.

use raga_common::config::{
    is_valid_key, load_config, load_toml_config, resolve_setting, CompiledDefaults, TomlConfig,
};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const PRIMARY: &str = "RAGA_BGM_TEST_PRIMARY_KEY";
const SECONDARY: &str = "RAGA_BGM_TEST_SECONDARY_KEY";

fn write_toml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_compiled_defaults() {
    let defaults = CompiledDefaults::default();
    assert_eq!(defaults.port, 5780);
    assert_eq!(defaults.gemini_model, "gemini-1.5-flash");
    assert_eq!(defaults.max_runs, 32);
    assert!(defaults.gemini_base_url.starts_with("https://"));
}

#[test]
fn test_full_toml_parses() {
    let file = write_toml(
        r#"
gemini_api_key = "abc"
gemini_model = "gemini-pro"
gemini_base_url = "http://127.0.0.1:9999"
request_timeout_secs = 5
output_dir = "/tmp/raga-out"
port = 6000
max_runs = 8

[logging]
level = "debug"
file = "/tmp/raga.log"
"#,
    );

    let config = load_toml_config(file.path()).unwrap();
    assert_eq!(config.gemini_api_key.as_deref(), Some("abc"));
    assert_eq!(config.gemini_model.as_deref(), Some("gemini-pro"));
    assert_eq!(config.request_timeout_secs, Some(5));
    assert_eq!(config.port, Some(6000));
    assert_eq!(config.max_runs, Some(8));
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.file.is_some());
}

#[test]
fn test_partial_toml_uses_defaults() {
    let file = write_toml("port = 7000\n");

    let config = load_toml_config(file.path()).unwrap();
    assert_eq!(config.port, Some(7000));
    assert!(config.gemini_api_key.is_none());
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.file.is_none());
}

#[test]
fn test_malformed_toml_is_config_error() {
    let file = write_toml("port = \"not a number\"\n");

    let err = load_toml_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
fn test_explicit_missing_file_is_error() {
    let result = load_config(Some(std::path::Path::new("/nonexistent/raga-bgm.toml")));
    assert!(result.is_err());
}

#[test]
fn test_toml_config_default_is_empty() {
    let config = TomlConfig::default();
    assert!(config.gemini_api_key.is_none());
    assert!(config.output_dir.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_is_valid_key() {
    assert!(is_valid_key("key-123"));
    assert!(!is_valid_key(""));
    assert!(!is_valid_key("   \t"));
}

#[test]
#[serial]
fn test_resolve_setting_env_beats_toml() {
    env::set_var(PRIMARY, "from-env");
    env::remove_var(SECONDARY);

    let resolved = resolve_setting("test key", &[PRIMARY, SECONDARY], Some("from-toml")).unwrap();
    assert_eq!(resolved.value, "from-env");
    assert!(resolved.source.contains(PRIMARY));

    env::remove_var(PRIMARY);
}

#[test]
#[serial]
fn test_resolve_setting_env_order() {
    env::set_var(PRIMARY, "first");
    env::set_var(SECONDARY, "second");

    let resolved = resolve_setting("test key", &[PRIMARY, SECONDARY], None).unwrap();
    assert_eq!(resolved.value, "first");

    env::remove_var(PRIMARY);
    let resolved = resolve_setting("test key", &[PRIMARY, SECONDARY], None).unwrap();
    assert_eq!(resolved.value, "second");

    env::remove_var(SECONDARY);
}

#[test]
#[serial]
fn test_resolve_setting_falls_back_to_toml() {
    env::remove_var(PRIMARY);
    env::set_var(SECONDARY, "   ");

    let resolved = resolve_setting("test key", &[PRIMARY, SECONDARY], Some("from-toml")).unwrap();
    assert_eq!(resolved.value, "from-toml");
    assert_eq!(resolved.source, "TOML");

    env::remove_var(SECONDARY);
}

#[test]
#[serial]
fn test_resolve_setting_none() {
    env::remove_var(PRIMARY);
    env::remove_var(SECONDARY);

    assert!(resolve_setting("test key", &[PRIMARY, SECONDARY], Some("")).is_none());
    assert!(resolve_setting("test key", &[PRIMARY, SECONDARY], None).is_none());
}
