//! # Configuration
//!
//! Layered configuration: built-in defaults, an optional `forum.toml`,
//! `.env`, then `FORUM_*` environment variables (highest precedence).
//! Nested keys use `__` in the environment, e.g.
//! `FORUM_SEED__MODERATOR_EMAIL`.

use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// tracing env-filter directive, e.g. "info,services=debug"
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".into()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

/// Account the seed tool provisions.
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    pub moderator_email: String,
    pub moderator_name: String,
    pub moderator_password: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Root directory of the JSON document store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub log: LogConfig,
    pub seed: Option<SeedConfig>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let cfg = config::Config::builder()
            .add_source(config::File::with_name("forum").required(false))
            .add_source(config::Environment::with_prefix("FORUM").separator("__"))
            .build()?;
        let app: AppConfig = cfg.try_deserialize()?;
        debug!(data_dir = %app.data_dir.display(), "configuration loaded");
        Ok(app)
    }
}
