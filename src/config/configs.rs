use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }
}

impl EnvConfig for AppConfig {
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

/// Connection settings. `url` wins over every other source of endpoints when set.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_idle: u32,
    pub connect_timeout_secs: u64,
    pub bootstrap: bool,
    pub fallback_profiles: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS as u32,
            min_idle: defaults::DEFAULT_DB_MIN_IDLE as u32,
            connect_timeout_secs: defaults::DEFAULT_DB_CONNECT_TIMEOUT_SECS as u64,
            bootstrap: defaults::DEFAULT_DB_BOOTSTRAP,
            fallback_profiles: defaults::DEFAULT_DB_FALLBACK_PROFILES,
        }
    }
}
