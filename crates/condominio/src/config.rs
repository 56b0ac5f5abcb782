//! Configuration management for condominio.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "condominio";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "condominio.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CONDOMINIO_`, sections split on `__`)
/// 2. TOML config file at `~/.config/condominio/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Announcements backend configuration.
    pub server: ServerConfig,
    /// Announcements client configuration.
    pub api: ApiConfig,
}

/// Which key-value backend holds the collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Embedded `SQLite` database on disk.
    #[default]
    Sqlite,
    /// Process-local map, lost on exit.
    Memory,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend holding the collections.
    pub backend: BackendKind,
    /// Path to the database file.
    /// Defaults to `~/.local/share/condominio/condominio.db`
    pub database_path: Option<PathBuf>,
    /// Write example records when a seeded collection is absent.
    pub seed_examples: bool,
}

/// Announcements backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the backend listens on.
    pub bind: String,
}

/// Announcements client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the announcements backend.
    pub base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Sqlite,
            database_path: None, // Resolved at runtime
            seed_examples: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5001".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, the TOML file and the environment.
    /// `None` reads the file at [`default_config_path`](Self::default_config_path).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("CONDOMINIO_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the bind address or the base URL do not parse.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        let url = reqwest::Url::parse(&self.api.base_url).map_err(|e| Error::ConfigValidation {
            message: format!("invalid api.base_url '{}': {e}", self.api.base_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::ConfigValidation {
                message: format!("api.base_url must be http or https, got '{}'", url.scheme()),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Parse the backend bind address.
    ///
    /// # Errors
    ///
    /// Returns an error if `server.bind` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| Error::ConfigValidation {
                message: format!("invalid server.bind '{}': {e}", self.server.bind),
            })
    }
}
