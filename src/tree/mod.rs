//! Virtual File Tree
//!
//! A flat path -> entry mapping with filesystem-like structural operations.
//! Folders have no independent existence: they are implied by shared path
//! prefixes, which turns folder rename and delete into prefix rewrites over
//! the mapping. The hierarchical view is a projection (see [`node::project`]).

pub mod node;
pub mod path;

use crate::defaults::{is_protected, DEFAULT_ACTIVE_FILE};
use crate::error::TreeError;
use crate::types::{FileEntry, FileMap};
use serde::{Deserialize, Serialize};

pub use node::{FileNode, FileTreeNode, FolderNode};

/// Whether an operation targets a single file or a prefix-implied folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// File mapping plus the active-file pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTree {
    entries: FileMap,
    active_file: String,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new(crate::defaults::default_files())
    }
}

impl FileTree {
    /// Wrap `entries` with the active pointer on the default entry file.
    pub fn new(entries: FileMap) -> Self {
        Self {
            entries,
            active_file: DEFAULT_ACTIVE_FILE.to_string(),
        }
    }

    pub fn entries(&self) -> &FileMap {
        &self.entries
    }

    pub fn into_entries(self) -> FileMap {
        self.entries
    }

    pub fn active_file(&self) -> &str {
        &self.active_file
    }

    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Point the editor at an existing file.
    pub fn select(&mut self, raw: &str) -> Result<(), TreeError> {
        let path = path::normalize(raw)?;
        if !self.entries.contains_key(&path) {
            return Err(TreeError::NotFound(path));
        }
        self.active_file = path;
        Ok(())
    }

    /// True when `path` is a key or an implied folder.
    pub fn exists(&self, path: &str) -> bool {
        self.entries.contains_key(path) || self.is_folder(path)
    }

    /// True when at least one key lies below `folder`.
    pub fn is_folder(&self, folder: &str) -> bool {
        self.keys_under(folder).next().is_some()
    }

    fn keys_under<'a>(&'a self, folder: &str) -> impl Iterator<Item = &'a String> + 'a {
        let prefix = format!("{}/", folder);
        self.entries
            .range(prefix.clone()..)
            .map(|(key, _)| key)
            .take_while(move |key| key.starts_with(&prefix))
    }

    /// Create a file, or a folder materialized by a `README.md` placeholder.
    ///
    /// Returns the inserted path, which also becomes the active file.
    pub fn create(&mut self, raw: &str, kind: NodeKind) -> Result<String, TreeError> {
        let path = path::normalize(raw)?;
        if self.exists(&path) {
            return Err(TreeError::AlreadyExists(path));
        }
        if let Some(file) = path::ancestors(&path).find(|a| self.entries.contains_key(*a)) {
            return Err(TreeError::InvalidTarget(format!("{} is a file", file)));
        }

        let (inserted, entry) = match kind {
            NodeKind::File => (
                path.clone(),
                FileEntry::new(format!("// New file created at {}", path)),
            ),
            NodeKind::Folder => (
                format!("{}/README.md", path),
                FileEntry::new(format!(
                    "# Folder: {}\n\nFolder created for organization.",
                    path
                )),
            ),
        };

        self.entries.insert(inserted.clone(), entry);
        self.active_file = inserted.clone();
        Ok(inserted)
    }

    /// Paths a delete of `path` would remove, checked against the protected list.
    ///
    /// Does not mutate; used to validate a delete before asking for confirmation.
    pub fn delete_targets(&self, raw: &str, kind: NodeKind) -> Result<Vec<String>, TreeError> {
        let path = path::normalize(raw)?;
        let targets: Vec<String> = match kind {
            NodeKind::File => self
                .entries
                .contains_key(&path)
                .then(|| vec![path.clone()])
                .unwrap_or_default(),
            NodeKind::Folder => self.keys_under(&path).cloned().collect(),
        };

        if targets.is_empty() {
            return Err(TreeError::NotFound(path));
        }
        if let Some(core) = targets.iter().find(|t| is_protected(t)) {
            return Err(TreeError::Protected(core.clone()));
        }
        Ok(targets)
    }

    /// Remove a file, or every file below a folder.
    ///
    /// Resets the active pointer to the default entry file when it was removed.
    pub fn delete(&mut self, raw: &str, kind: NodeKind) -> Result<Vec<String>, TreeError> {
        let targets = self.delete_targets(raw, kind)?;
        for target in &targets {
            self.entries.remove(target);
        }
        if targets.iter().any(|t| *t == self.active_file) {
            self.active_file = DEFAULT_ACTIVE_FILE.to_string();
        }
        Ok(targets)
    }

    /// Rename the last segment of `old` to `new_name`, moving its whole subtree.
    ///
    /// Returns the new path.
    pub fn rename(&mut self, old: &str, new_name: &str) -> Result<String, TreeError> {
        let old_path = path::normalize(old)?;
        if new_name.is_empty() || new_name.contains('/') {
            return Err(TreeError::InvalidTarget(new_name.to_string()));
        }
        let new_path = format!("{}/{}", path::dirname(&old_path), new_name);
        if new_path == old_path || self.exists(&new_path) {
            return Err(TreeError::InvalidTarget(new_path));
        }

        let moved: Vec<String> = self
            .entries
            .keys()
            .filter(|key| path::is_within(key, &old_path))
            .cloned()
            .collect();
        if moved.is_empty() {
            return Err(TreeError::NotFound(old_path));
        }
        if let Some(core) = moved.iter().find(|p| is_protected(p)) {
            return Err(TreeError::Protected(core.clone()));
        }

        for key in moved {
            if let Some(entry) = self.entries.remove(&key) {
                self.entries
                    .insert(path::rebase(&key, &old_path, &new_path), entry);
            }
        }
        if path::is_within(&self.active_file, &old_path) {
            self.active_file = path::rebase(&self.active_file, &old_path, &new_path);
        }
        Ok(new_path)
    }

    /// Replace the code of an existing file.
    pub fn edit(&mut self, raw: &str, code: impl Into<String>) -> Result<(), TreeError> {
        let path = path::normalize(raw)?;
        let entry = self
            .entries
            .get_mut(&path)
            .ok_or_else(|| TreeError::NotFound(path.clone()))?;
        if entry.is_read_only() {
            return Err(TreeError::ReadOnly(path));
        }
        entry.code = code.into();
        Ok(())
    }

    /// Hierarchical display view of the current mapping.
    pub fn project(&self) -> Vec<FileTreeNode> {
        node::project(&self.entries)
    }
}
