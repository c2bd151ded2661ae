//! Configuration loaded from `blocksql.toml`.
//!
//! ```toml
//! [database]
//! url = "postgres://localhost/app"
//! max_connections = 5
//!
//! [log]
//! level = "debug"
//! json = false
//! ```
//!
//! Every key is optional. `BLOCKSQL_DATABASE_URL` overrides `database.url`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};

/// File looked up in the working directory.
pub const CONFIG_FILE: &str = "blocksql.toml";

/// Environment variable overriding `database.url`.
pub const DATABASE_URL_ENV: &str = "BLOCKSQL_DATABASE_URL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    /// Overrides the dialect inferred from the URL scheme.
    pub dialect: Option<Dialect>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            dialect: None,
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> OrmResult<Self> {
        toml::from_str(content).map_err(|e| OrmError::Config(e.to_string()))
    }

    pub fn from_path(path: &Path) -> OrmResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// `./blocksql.toml`, then `<config dir>/blocksql/config.toml`.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("blocksql").join("config.toml"));
        }
        paths
    }

    /// Load the first existing file among `paths`, or defaults if none exist.
    pub fn load_from(paths: &[PathBuf]) -> OrmResult<Self> {
        for path in paths {
            if path.is_file() {
                tracing::debug!("loading config from {}", path.display());
                return Self::from_path(path);
            }
        }
        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Load from the default locations and apply the environment override.
    pub fn load() -> OrmResult<Self> {
        let config = Self::load_from(&Self::default_paths())?;
        Ok(config.with_database_url(std::env::var(DATABASE_URL_ENV).ok()))
    }

    /// Replace the database URL when `url` is set and non-empty.
    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            self.database.url = Some(url);
        }
        self
    }
}
