//! Client configuration.
//!
//! Loaded from a TOML file or from `TODO_*` environment variables on top of
//! the defaults, then validated.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hooks::StaleDataPolicy;
use crate::messages::Locale;

pub const ENV_API_URL: &str = "TODO_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "TODO_API_TIMEOUT_SECS";
pub const ENV_LOCALE: &str = "TODO_LOCALE";
pub const ENV_TOKEN_STORE: &str = "TODO_TOKEN_STORE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the todo API, without a trailing path.
    pub base_url: String,
    pub timeout_secs: u64,
    pub locale: Locale,
    /// What the todo list keeps when a refetch fails.
    pub stale_data_policy: StaleDataPolicy,
    /// Where the token pair is persisted. Defaults to the platform data dir.
    pub token_store_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
            locale: Locale::default(),
            stale_data_policy: StaleDataPolicy::default(),
            token_store_path: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup` (an environment-like source) to the
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_API_URL) {
            config.base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{ENV_TIMEOUT_SECS} must be an integer, got {secs:?}")))?;
        }
        if let Some(locale) = lookup(ENV_LOCALE) {
            config.locale = locale.parse().map_err(ConfigError::Invalid)?;
        }
        if let Some(path) = lookup(ENV_TOKEN_STORE) {
            config.token_store_path = Some(PathBuf::from(path));
        }
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ClientConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn token_store_path(&self) -> PathBuf {
        match &self.token_store_path {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("todo-client")
                .join("tokens.json"),
        }
    }
}
