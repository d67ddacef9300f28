//! Bootstrap configuration loading and setting resolution
//!
//! Settings come from three places, highest priority first:
//! 1. Command-line arguments (handled by each binary)
//! 2. Environment variables
//! 3. TOML config file
//!
//! Anything still unset falls back to [`CompiledDefaults`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Application directory name under the platform config dir
pub const APP_DIR_NAME: &str = "raga-bgm";

/// Config file name inside [`APP_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Bootstrap configuration loaded from TOML
///
/// Every field is optional so that a partial (or missing) file still
/// produces a usable configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Gemini API key (lowest priority source, ENV wins)
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Gemini model name, e.g. "gemini-1.5-flash"
    #[serde(default)]
    pub gemini_model: Option<String>,

    /// Base URL of the text-generation endpoint
    #[serde(default)]
    pub gemini_base_url: Option<String>,

    /// Request timeout for the text-generation call
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Directory the web service writes per-run artifacts into
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// HTTP port of the web service
    #[serde(default)]
    pub port: Option<u16>,

    /// Completed web runs kept for download before the oldest is evicted
    #[serde(default)]
    pub max_runs: Option<usize>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Built-in defaults used when neither ENV nor TOML provides a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub request_timeout_secs: u64,
    pub output_dir: PathBuf,
    pub port: u16,
    pub max_runs: usize,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            request_timeout_secs: 120,
            output_dir: PathBuf::from("raga_bgm_runs"),
            port: 5780,
            max_runs: 32,
        }
    }
}

/// Platform config file location, e.g. `~/.config/raga-bgm/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))
}

/// Load the bootstrap config
///
/// An explicitly requested file must exist and parse. The platform default
/// file is optional: when it is absent the built-in defaults are used.
pub fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        let config = load_toml_config(path)?;
        info!("Loaded config from {}", path.display());
        return Ok(config);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        }
        Some(path) => {
            warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        None => {
            warn!("Could not determine config directory, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// A setting value together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSetting {
    pub value: String,
    pub source: String,
}

/// Resolve a string setting from ENV (in the given order) then TOML
///
/// Blank values are ignored. When more than one source carries a value a
/// warning names them all, and the highest priority one wins.
pub fn resolve_setting(
    name: &str,
    env_vars: &[&str],
    toml_value: Option<&str>,
) -> Option<ResolvedSetting> {
    let mut candidates: Vec<ResolvedSetting> = Vec::new();

    for var in env_vars {
        if let Ok(value) = std::env::var(var) {
            if is_valid_key(&value) {
                candidates.push(ResolvedSetting {
                    value,
                    source: format!("environment ({})", var),
                });
            }
        }
    }

    if let Some(value) = toml_value {
        if is_valid_key(value) {
            candidates.push(ResolvedSetting {
                value: value.to_string(),
                source: "TOML".to_string(),
            });
        }
    }

    if candidates.len() > 1 {
        let sources: Vec<&str> = candidates.iter().map(|c| c.source.as_str()).collect();
        warn!(
            "{} found in multiple sources: {}. Using {}.",
            name,
            sources.join(", "),
            sources[0]
        );
    }

    let resolved = candidates.into_iter().next();
    if let Some(setting) = &resolved {
        info!("{} loaded from {}", name, setting.source);
    }
    resolved
}

/// Validate a key-like value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
