//! Core types shared by the file-tree model, the project service and the session.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat path -> entry mapping. Sorted keys give the tree projection its order.
pub type FileMap = BTreeMap<String, FileEntry>;

/// One path's content plus display flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub code: String,
    /// Excluded from the tree display
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

impl FileEntry {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            hidden: false,
            read_only: None,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.unwrap_or(false)
    }
}

/// Project configuration: npm dependency manifest plus opaque display toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default = "empty_dependencies")]
    pub dependencies_json: String,
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

fn empty_dependencies() -> String {
    "{}".to_string()
}

impl ProjectConfig {
    /// Parsed dependency map; anything that is not a JSON object reads as empty.
    pub fn dependencies(&self) -> BTreeMap<String, String> {
        match serde_json::from_str::<serde_json::Value>(&self.dependencies_json) {
            Ok(serde_json::Value::Object(map)) => map
                .into_iter()
                .map(|(name, version)| {
                    let version = match version {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (name, version)
                })
                .collect(),
            _ => BTreeMap::new(),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            dependencies_json: empty_dependencies(),
            options: serde_json::Map::new(),
        }
    }
}

/// `{projectId, updatedAt}` pair returned by save and list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub project_id: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
