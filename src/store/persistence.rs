//! Sled-backed ProjectStore.
//!
//! Keys are `len(user_id) as u32 BE ++ user_id ++ project_id`, so all of a
//! user's projects share one prefix and no user id can be a prefix of another
//! user's key space. Values are bincode-encoded [`ProjectRecord`]s.

use crate::error::StorageError;
use crate::store::{sort_recent_first, ProjectKey, ProjectRecord, ProjectStore};
use crate::types::ProjectSummary;
use std::path::Path;

const PROJECTS_TREE: &str = "projects";

pub struct SledProjectStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledProjectStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Throwaway database removed when dropped.
    pub fn temporary() -> Result<Self, StorageError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    pub fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        let tree = db.open_tree(PROJECTS_TREE)?;
        Ok(Self { db, tree })
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }

    fn user_prefix(user_id: &str) -> Vec<u8> {
        let mut prefix = Vec::with_capacity(4 + user_id.len());
        prefix.extend_from_slice(&(user_id.len() as u32).to_be_bytes());
        prefix.extend_from_slice(user_id.as_bytes());
        prefix
    }

    fn encode_key(key: &ProjectKey) -> Vec<u8> {
        let mut bytes = Self::user_prefix(&key.user_id);
        bytes.extend_from_slice(key.project_id.as_bytes());
        bytes
    }
}

impl ProjectStore for SledProjectStore {
    fn find(&self, key: &ProjectKey) -> Result<Option<ProjectRecord>, StorageError> {
        match self.tree.get(Self::encode_key(key))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn upsert(&self, record: &ProjectRecord) -> Result<(), StorageError> {
        let bytes = bincode::serialize(record)?;
        self.tree.insert(Self::encode_key(&record.key()), bytes)?;
        self.tree.flush()?;
        Ok(())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<ProjectSummary>, StorageError> {
        let mut summaries = Vec::new();
        for item in self.tree.scan_prefix(Self::user_prefix(user_id)) {
            let (_, bytes) = item?;
            let record: ProjectRecord = bincode::deserialize(&bytes)?;
            summaries.push(record.summary());
        }
        sort_recent_first(&mut summaries);
        Ok(summaries)
    }

    fn delete(&self, key: &ProjectKey) -> Result<bool, StorageError> {
        let removed = self.tree.remove(Self::encode_key(key))?;
        self.tree.flush()?;
        Ok(removed.is_some())
    }
}
