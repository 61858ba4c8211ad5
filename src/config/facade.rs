//! ConfigLoader facade delegating to merge service.

use super::merge::MergeService;
use super::PlaygroundConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from files and environment.
    pub fn load(workspace_root: &Path) -> Result<PlaygroundConfig, ConfigError> {
        MergeService::load(workspace_root)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<PlaygroundConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> PlaygroundConfig {
        PlaygroundConfig::default()
    }

    /// Render a configuration as TOML.
    pub fn to_toml(config: &PlaygroundConfig) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(config)
    }
}
