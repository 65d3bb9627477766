//! Configuration loading.
//!
//! Precedence, lowest first: built-in defaults, an optional TOML file,
//! environment variables, then whatever the caller (the CLI) overrides.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8081";

pub const ENV_BASE_URL: &str = "BOOK_CATALOG_URL";
pub const ENV_TIMEOUT_MS: &str = "BOOK_CATALOG_TIMEOUT_MS";
pub const ENV_LISTEN_ADDR: &str = "BOOK_CATALOG_LISTEN";

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
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub server: ServerConfig,
}

/// Where the book service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    /// Per-request timeout. `None` waits forever.
    pub timeout_ms: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: None,
        }
    }
}

impl GatewayConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Reference server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

impl Config {
    /// Defaults, then the file at `path` (if given), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Overlay environment values. `lookup` is injectable so tests don't
    /// have to touch the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.gateway.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let ms = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_MS,
                value: raw.clone(),
            })?;
            self.gateway.timeout_ms = Some(ms);
        }
        if let Some(addr) = lookup(ENV_LISTEN_ADDR) {
            self.server.listen_addr = addr;
        }
        Ok(())
    }
}
