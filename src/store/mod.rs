//! Project Store
//!
//! Durable storage for one record per (user, project) pair. The whole file
//! mapping and config are kept as opaque serialized strings; the store never
//! looks inside them.

pub mod memory;
pub mod persistence;

use crate::error::StorageError;
use crate::types::ProjectSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use memory::MemoryProjectStore;
pub use persistence::SledProjectStore;

/// Composite identity of a record: the same project id may exist under
/// several users as independent records.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectKey {
    pub user_id: String,
    pub project_id: String,
}

impl ProjectKey {
    pub fn new(user_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            project_id: project_id.into(),
        }
    }
}

/// Persisted project document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub project_id: String,
    pub user_id: String,
    /// Serialized file mapping
    pub files: String,
    /// Serialized project config
    pub config: String,
    pub updated_at: DateTime<Utc>,
    pub s3_assets_link: Option<String>,
}

impl ProjectRecord {
    pub fn key(&self) -> ProjectKey {
        ProjectKey::new(self.user_id.clone(), self.project_id.clone())
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            project_id: self.project_id.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// ProjectStore interface
///
/// Every operation is keyed by the composite `(user_id, project_id)`.
pub trait ProjectStore: Send + Sync {
    fn find(&self, key: &ProjectKey) -> Result<Option<ProjectRecord>, StorageError>;

    /// Create the record or fully overwrite the existing one.
    fn upsert(&self, record: &ProjectRecord) -> Result<(), StorageError>;

    /// Every project owned by `user_id`, most recently updated first.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<ProjectSummary>, StorageError>;

    /// Remove the record; returns whether one existed.
    fn delete(&self, key: &ProjectKey) -> Result<bool, StorageError>;
}

/// Newest first; equal timestamps fall back to project id so listings are stable.
pub(crate) fn sort_recent_first(summaries: &mut [ProjectSummary]) {
    summaries.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.project_id.cmp(&b.project_id))
    });
}
