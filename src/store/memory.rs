//! In-memory ProjectStore, used for tests and ephemeral servers.

use crate::error::StorageError;
use crate::store::{sort_recent_first, ProjectKey, ProjectRecord, ProjectStore};
use crate::types::ProjectSummary;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Default)]
pub struct MemoryProjectStore {
    records: RwLock<BTreeMap<ProjectKey, ProjectRecord>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl ProjectStore for MemoryProjectStore {
    fn find(&self, key: &ProjectKey) -> Result<Option<ProjectRecord>, StorageError> {
        Ok(self.records.read().get(key).cloned())
    }

    fn upsert(&self, record: &ProjectRecord) -> Result<(), StorageError> {
        self.records.write().insert(record.key(), record.clone());
        Ok(())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<ProjectSummary>, StorageError> {
        let mut summaries: Vec<ProjectSummary> = self
            .records
            .read()
            .values()
            .filter(|record| record.user_id == user_id)
            .map(ProjectRecord::summary)
            .collect();
        sort_recent_first(&mut summaries);
        Ok(summaries)
    }

    fn delete(&self, key: &ProjectKey) -> Result<bool, StorageError> {
        Ok(self.records.write().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::conformance;

    #[test]
    fn test_upsert_then_find() {
        conformance::upsert_then_find(&MemoryProjectStore::new());
    }

    #[test]
    fn test_composite_keys_are_independent() {
        conformance::composite_keys_are_independent(&MemoryProjectStore::new());
    }

    #[test]
    fn test_list_orders_recent_first() {
        conformance::list_orders_recent_first(&MemoryProjectStore::new());
    }

    #[test]
    fn test_user_prefix_does_not_leak() {
        conformance::user_prefix_does_not_leak(&MemoryProjectStore::new());
    }

    #[test]
    fn test_delete_twice() {
        let store = MemoryProjectStore::new();
        conformance::delete_twice(&store);
        assert!(store.is_empty());
    }
}
