//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/messagely/config.toml`).
//! Every section and field is optional; missing values fall back to the
//! defaults below. `MESSAGELY_SECRET_KEY` overrides `security.secret_key` so
//! the signing secret can stay out of the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::password::{MAX_WORK_FACTOR, MIN_WORK_FACTOR};
use crate::infrastructure::DatabaseConfig;

/// `database.url` value that selects the in-memory store.
pub const MEMORY_DATABASE: &str = "memory";

pub const SECRET_KEY_ENV: &str = "MESSAGELY_SECRET_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests on shutdown.
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 3000,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let defaults = DatabaseConfig::default();
        Self {
            url: defaults.url,
            max_connections: defaults.max_connections,
        }
    }
}

impl DatabaseSection {
    pub fn is_memory(&self) -> bool {
        self.url == MEMORY_DATABASE
    }

    pub fn connection_url(&self) -> &str {
        &self.url
    }

    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// HMAC secret for signing tokens. Must be non-empty.
    pub secret_key: String,
    /// bcrypt cost, 4..=31.
    pub bcrypt_work_factor: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            bcrypt_work_factor: 12,
        }
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("secret_key", &"<redacted>")
            .field("bcrypt_work_factor", &self.bcrypt_work_factor)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults; a file that
    /// exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?
        } else {
            Self::default()
        };

        if let Ok(secret) = std::env::var(SECRET_KEY_ENV) {
            if !secret.is_empty() {
                config.security.secret_key = secret;
            }
        }

        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        std::fs::write(path, raw).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.secret_key.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "security.secret_key must be set (or {})",
                SECRET_KEY_ENV
            )));
        }
        let wf = self.security.bcrypt_work_factor;
        if !(MIN_WORK_FACTOR..=MAX_WORK_FACTOR).contains(&wf) {
            return Err(ConfigError::Invalid(format!(
                "security.bcrypt_work_factor must be between {} and {}, got {}",
                MIN_WORK_FACTOR, MAX_WORK_FACTOR, wf
            )));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url must be set".into()));
        }
        match self.logging.format.to_lowercase().as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                other
            ))),
        }
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }
}

/// `~/.config/messagely/config.toml`, or `./config.toml` when the platform
/// has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|d| d.join("messagely").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}
