//! Client configuration.
//!
//! Reads `~/.inventory/config.toml`. Every section and every key is
//! optional; a missing file yields the defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or saving the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub navigation: NavigationConfig,
    pub dev_server: DevServerConfig,
    pub log: LogConfig,
}

/// REST client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server origin (e.g. "http://127.0.0.1:5000"). Empty means
    /// relative to whatever serves the shell.
    pub server: String,

    /// Path prefix shared by every endpoint.
    pub base_path: String,

    /// Client-wide request timeout.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: "http://127.0.0.1:5000".to_string(),
            base_path: "/api".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    /// `{server}{base_path}` without a trailing slash.
    pub fn base_url(&self) -> String {
        let server = self.server.trim_end_matches('/');
        let path = self.base_path.trim_matches('/');
        if path.is_empty() {
            server.to_string()
        } else {
            format!("{}/{}", server, path)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Navigation pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Upper bound for a single before-guard to reach a decision.
    pub guard_timeout_ms: u64,

    /// Appended to every page title: "{title} - {suffix}".
    pub title_suffix: String,

    /// Redirect hops allowed within one transition.
    pub max_redirects: usize,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            guard_timeout_ms: 5000,
            title_suffix: "库存管理系统".to_string(),
            max_redirects: 8,
        }
    }
}

impl NavigationConfig {
    pub fn guard_timeout(&self) -> Duration {
        Duration::from_millis(self.guard_timeout_ms)
    }
}

/// Development server: serves the shell and proxies `/api` to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevServerConfig {
    pub listen: String,
    pub proxy_target: String,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8081".to_string(),
            proxy_target: "http://127.0.0.1:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Default config file path: ~/.inventory/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file missing, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_toml()?).map_err(io_err)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Return the inventory config directory (~/.inventory).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".inventory")
}
