//! Configuration
//!
//! Layered settings loaded with the `config` crate. Every section carries
//! serde defaults, so an empty source set yields a usable configuration.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod storage;

use crate::defaults::{DEFAULT_PROJECT_ID, DEFAULT_USER_ID};
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

pub use facade::ConfigLoader;
pub use storage::StorageConfig;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaygroundConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ApiError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                ApiError::ConfigError(format!(
                    "Invalid listen address {}:{}: {}",
                    self.host, self.port, e
                ))
            })
    }
}

/// Client-side session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Base URL of the project endpoints
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Identity asserted on every request
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Project loaded on mount
    #[serde(default = "default_project_id")]
    pub default_project_id: String,
    #[serde(default = "default_autosave_interval_ms")]
    pub autosave_interval_ms: u64,
    /// How long a non-loading status message stays visible
    #[serde(default = "default_status_ttl_ms")]
    pub status_ttl_ms: u64,
}

fn default_api_base() -> String {
    format!("http://127.0.0.1:{}{}", default_port(), crate::server::PROJECTS_ROUTE)
}

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

fn default_project_id() -> String {
    DEFAULT_PROJECT_ID.to_string()
}

fn default_autosave_interval_ms() -> u64 {
    5000
}

fn default_status_ttl_ms() -> u64 {
    3000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            user_id: default_user_id(),
            default_project_id: default_project_id(),
            autosave_interval_ms: default_autosave_interval_ms(),
            status_ttl_ms: default_status_ttl_ms(),
        }
    }
}

impl SessionConfig {
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_millis(self.autosave_interval_ms)
    }

    pub fn status_ttl(&self) -> Duration {
        Duration::from_millis(self.status_ttl_ms)
    }
}
