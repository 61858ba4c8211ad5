//! MergeService: orchestrates sources and deserializes to PlaygroundConfig.

use crate::config::sources::{self, environment};
use crate::config::PlaygroundConfig;
use config::{Config, ConfigError, File, FileFormat};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from workspace and standard sources.
    /// Precedence: global file (lowest) -> workspace file -> environment (highest).
    pub fn load(workspace_root: &Path) -> Result<PlaygroundConfig, ConfigError> {
        let builder = Config::builder();
        let builder = sources::add_global_file(builder);
        let builder = sources::add_workspace_file(builder, workspace_root);
        let builder = environment::add_to_builder(builder);

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<PlaygroundConfig, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        let builder = environment::add_to_builder(builder);

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join(sources::WORKSPACE_CONFIG_FILE),
            "[server]\nport = 4100\n\n[storage]\nassets_bucket = \"assets\"\n",
        )
        .unwrap();

        let config = MergeService::load(temp.path()).unwrap();
        assert_eq!(config.server.port, 4100);
        assert_eq!(config.storage.assets_bucket.as_deref(), Some("assets"));
        assert_eq!(config.session.status_ttl_ms, 3000);
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let temp = tempfile::tempdir().unwrap();
        assert!(MergeService::load_from_file(&temp.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("custom.toml");
        std::fs::write(&path, "[session]\nuser_id = \"dev\"\n").unwrap();
        let config = MergeService::load_from_file(&path).unwrap();
        assert_eq!(config.session.user_id, "dev");
    }
}
