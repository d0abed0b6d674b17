//! Server configuration from environment variables and an optional TOML file.

use std::env;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {var}: {value}")]
    InvalidEnv { var: String, value: String },
}

/// Runtime configuration for the CropSense server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Seconds before a pending custom-area analysis is failed.
    pub analysis_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            analysis_timeout_secs: 120,
        }
    }
}

impl ServerConfig {
    /// Load configuration.
    ///
    /// Order of precedence, lowest to highest: built-in defaults, the TOML
    /// file named by `CROPSENSE_CONFIG` (if set), then the `HOST`, `PORT`
    /// and `ANALYSIS_TIMEOUT_SECS` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("CROPSENSE_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            config.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PORT".to_string(),
                value: port,
            })?;
        }
        if let Ok(timeout) = env::var("ANALYSIS_TIMEOUT_SECS") {
            config.analysis_timeout_secs =
                timeout.parse().map_err(|_| ConfigError::InvalidEnv {
                    var: "ANALYSIS_TIMEOUT_SECS".to_string(),
                    value: timeout,
                })?;
        }

        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().display().to_string();
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path_str.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path_str,
            source,
        })
    }
}
