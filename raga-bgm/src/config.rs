//! Configuration resolution for raga-bgm
//!
//! Gemini API key priority: ENV `RAGA_BGM_GEMINI_API_KEY` → ENV
//! `GEMINI_API_KEY` → TOML `gemini_api_key`. Other settings take the TOML
//! value when present and the compiled default otherwise; the binaries
//! apply their command-line overrides on top.

use raga_common::config::{resolve_setting, CompiledDefaults, LoggingConfig, TomlConfig};
use raga_common::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::services::GeminiConfig;

/// Environment variables consulted for the API key, highest priority first
pub const API_KEY_ENV_VARS: [&str; 2] = ["RAGA_BGM_GEMINI_API_KEY", "GEMINI_API_KEY"];

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct BgmConfig {
    pub gemini: GeminiConfig,
    /// Root for per-run artifact directories (web service)
    pub output_dir: PathBuf,
    pub port: u16,
    /// Completed web runs kept for download
    pub max_runs: usize,
    pub logging: LoggingConfig,
}

impl BgmConfig {
    /// Resolve from a loaded TOML config plus environment
    ///
    /// Fails when no API key is configured anywhere, before any network
    /// call is attempted.
    pub fn resolve(toml_config: TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::default();
        let gemini = gemini_config(&toml_config, &defaults)?;

        Ok(Self {
            gemini,
            output_dir: toml_config.output_dir.clone().unwrap_or(defaults.output_dir),
            port: toml_config.port.unwrap_or(defaults.port),
            max_runs: toml_config.max_runs.unwrap_or(defaults.max_runs),
            logging: toml_config.logging,
        })
    }
}

/// Resolve the Gemini API key from ENV then TOML
pub fn resolve_gemini_api_key(toml_config: &TomlConfig) -> Result<String> {
    resolve_setting(
        "Gemini API key",
        &API_KEY_ENV_VARS,
        toml_config.gemini_api_key.as_deref(),
    )
    .map(|setting| setting.value)
    .ok_or_else(|| {
        Error::Config(
            "Gemini API key not configured. Please configure using one of:\n\
             1. Environment: RAGA_BGM_GEMINI_API_KEY=your-key-here (or GEMINI_API_KEY)\n\
             2. TOML config: ~/.config/raga-bgm/config.toml (gemini_api_key = \"your-key\")"
                .to_string(),
        )
    })
}

fn gemini_config(toml_config: &TomlConfig, defaults: &CompiledDefaults) -> Result<GeminiConfig> {
    Ok(GeminiConfig {
        api_key: resolve_gemini_api_key(toml_config)?,
        model: toml_config
            .gemini_model
            .clone()
            .unwrap_or_else(|| defaults.gemini_model.clone()),
        base_url: toml_config
            .gemini_base_url
            .clone()
            .unwrap_or_else(|| defaults.gemini_base_url.clone()),
        timeout: Duration::from_secs(
            toml_config
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
        ),
    })
}
