//! Layered configuration using figment.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`PARENTING_DIGEST_*`, `__` separates sections)
//! 2. `~/.config/parenting-digest/config.toml` (or an explicit `--config` file)
//! 3. Built-in defaults
//!
//! `PARENTING_DIGEST_AGENT__ENDPOINT` maps to `agent.endpoint`,
//! `PARENTING_DIGEST_STORAGE__DATA_DIR` to `storage.data_dir`, and so on.

mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::ConfigError;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

const APP_DIR_NAME: &str = "parenting-digest";
const ENV_PREFIX: &str = "PARENTING_DIGEST_";

const fn default_timeout_secs() -> u64 {
    120
}

const fn default_save_delay_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    /// URL the instruction is POSTed to
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { endpoint: String::new(), api_key: None, timeout_secs: default_timeout_secs() }
    }
}

impl AgentConfig {
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Overrides the platform data directory
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Minimum time an email save appears to take
    #[serde(default = "default_save_delay_ms")]
    pub save_delay_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { save_delay_ms: default_save_delay_ms() }
    }
}

impl UiConfig {
    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms)
    }
}

impl AppConfig {
    /// Load from the user config file and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(None).extract().map_err(ConfigError::from)
    }

    /// Load with an explicit config file in place of the user-global one
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile { path: path.to_path_buf() });
        }
        Self::figment(Some(path)).extract().map_err(ConfigError::from)
    }

    /// Build the provider chain (public so tests can layer on top)
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let file = config_file.map(Path::to_path_buf).or_else(Self::global_config_path);
        if let Some(path) = file
            && path.exists()
        {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Directory holding the store file and the interactive-mode log
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "storage.data_dir".to_string(),
                reason: "no platform data directory; set PARENTING_DIGEST_STORAGE__DATA_DIR"
                    .to_string(),
            })
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR_NAME).join("config.toml"))
    }
}
