use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

const APP_NAME: &str = "tethercalc";

/// Environment variable that overrides `provider.api_key`.
pub const API_KEY_ENV: &str = "FFLOGS_API_KEY";

// ─────────────────────────────────────────────────────────────────────────────
// Provider Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Report API root; calls are made to `{base_url}/{call}/{report}`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    /// Ask the provider for translated (English) ability and actor names.
    #[serde(default = "default_translate")]
    pub translate: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://www.fflogs.com:443/v1/report".to_string()
}

fn default_translate() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("tethercalc/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            translate: default_translate(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Analysis / Logging Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Tether windows analyzed at once. Output order never depends on this.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    1
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Append logs to this file in addition to stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from the platform config directory, creating defaults if missing.
    pub fn load() -> Result<Self> {
        let config: Self = confy::load(APP_NAME, None)?;
        Ok(config.with_env_overrides())
    }

    /// Load from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Self = confy::load_path(path)?;
        Ok(config.with_env_overrides())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }

    fn with_env_overrides(mut self) -> Self {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => self.provider.api_key = key,
            _ => {}
        }
        self
    }
}
