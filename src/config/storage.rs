//! StorageConfig and path resolution for the project database.

use crate::config::paths;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database directory; relative paths resolve against the workspace root.
    /// Unset means the XDG data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Bucket used to derive each project's `s3://` asset link
    #[serde(default)]
    pub assets_bucket: Option<String>,
}

impl StorageConfig {
    /// Resolve the database directory to an actual filesystem location.
    pub fn resolve_path(&self, workspace_root: &Path) -> Result<PathBuf, ApiError> {
        match &self.path {
            Some(path) if path.is_absolute() => Ok(path.clone()),
            Some(path) => Ok(workspace_root.join(path)),
            None => paths::default_store_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_joins_workspace() {
        let config = StorageConfig {
            path: Some(PathBuf::from("data/store")),
            assets_bucket: None,
        };
        let resolved = config.resolve_path(Path::new("/srv/playground")).unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/playground/data/store"));
    }

    #[test]
    fn test_absolute_path_kept() {
        let config = StorageConfig {
            path: Some(PathBuf::from("/var/lib/playground")),
            assets_bucket: None,
        };
        let resolved = config.resolve_path(Path::new("/ignored")).unwrap();
        assert_eq!(resolved, PathBuf::from("/var/lib/playground"));
    }
}
