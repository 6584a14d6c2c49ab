use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::completion::{ApiKey, DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::text::NormalizerConfig;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("no API key configured; set XAI_API_KEY or `api_key` in the config file")]
    MissingApiKey,
}

const DEFAULT_DATABASE_PATH: &str = "data/training_data.db";
const DEFAULT_EXPORT_PATH: &str = "data/training_data.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<ApiKey>,
    pub api_base: String,
    pub model: String,
    /// Per-request timeout; 0 disables it.
    pub request_timeout_secs: u64,
    pub database_path: PathBuf,
    pub export_path: PathBuf,
    pub log_file: Option<PathBuf>,
    pub normalizer: NormalizerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            log_file: None,
            normalizer: NormalizerConfig::default(),
        }
    }
}

impl Config {
    /// Read `path` if it exists, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = if path.exists() {
            Some(std::fs::read_to_string(path)?)
        } else {
            None
        };
        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Build a config from optional TOML text and a variable lookup.
    pub fn from_sources<F>(contents: Option<&str>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match contents {
            Some(contents) => toml::from_str::<Config>(contents)?,
            None => Config::default(),
        };

        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(api_key) = lookup("XAI_API_KEY") {
            config.api_key = Some(ApiKey::new(api_key));
        }
        if let Some(api_base) = lookup("XAI_API_BASE") {
            config.api_base = api_base;
        }
        if let Some(model) = lookup("XAI_MODEL") {
            config.model = model;
        }
        if let Some(database_path) = lookup("TRAINING_DB_PATH") {
            config.database_path = PathBuf::from(database_path);
        }
        if let Some(export_path) = lookup("TRAINING_EXPORT_PATH") {
            config.export_path = PathBuf::from(export_path);
        }
        Ok(config)
    }

    pub fn require_api_key(&self) -> ConfigResult<&ApiKey> {
        self.api_key.as_ref().ok_or(ConfigError::MissingApiKey)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
