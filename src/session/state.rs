//! Session state and the actions that mutate it.
//!
//! Every change to the editor session goes through [`SessionState::apply`].
//! Content-changing actions advance `revision`; a successful save records the
//! revision and content fingerprint it covered, which is what autosave
//! compares against.

use super::client::LoadedProject;
use crate::defaults::{default_config, default_files, DEFAULT_PROJECT_ID};
use crate::error::SessionError;
use crate::tree::{FileTree, FileTreeNode, NodeKind};
use crate::types::ProjectConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Loading,
    Ready,
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Loading,
    Info,
    Success,
    Error,
}

/// Transient status-bar message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

impl StatusMessage {
    /// Loading messages stay until replaced; everything else expires after `ttl`.
    pub fn is_visible(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        if self.kind == StatusKind::Loading {
            return true;
        }
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now < self.posted_at + ttl,
            Err(_) => true,
        }
    }
}

/// A validated delete waiting for the user's confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingDelete {
    pub path: String,
    pub kind: NodeKind,
    pub targets: Vec<String>,
}

/// Content and revision captured when a save starts.
#[derive(Debug, Clone)]
pub struct SaveSnapshot {
    pub project_id: String,
    pub tree: FileTree,
    pub config: ProjectConfig,
    pub revision: u64,
    pub fingerprint: String,
}

#[derive(Debug, Clone)]
pub enum Action {
    SelectFile(String),
    Create { path: String, kind: NodeKind },
    RequestDelete { path: String, kind: NodeKind },
    ConfirmDelete,
    CancelDelete,
    Rename { path: String, new_name: String },
    Edit { path: String, code: String },
    /// Raw dependency manifest text; must be a JSON object.
    UpdateDependencies(String),
    SetOption { key: String, value: serde_json::Value },
    SetAutosave(bool),
    LoadStarted(String),
    LoadSucceeded(LoadedProject),
    LoadFailed(String),
    SaveStarted,
    SaveSucceeded {
        project_id: String,
        revision: u64,
        fingerprint: String,
    },
    SaveFailed(String),
    Refresh,
    ClearStatus,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    project_id: String,
    tree: FileTree,
    config: ProjectConfig,
    phase: SessionPhase,
    status: Option<StatusMessage>,
    autosave: bool,
    revision: u64,
    saved_revision: u64,
    saved_fingerprint: String,
    pending_delete: Option<PendingDelete>,
    preview_generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        let mut state = Self {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            tree: FileTree::new(default_files()),
            config: default_config(),
            phase: SessionPhase::Ready,
            status: None,
            autosave: false,
            revision: 0,
            saved_revision: 0,
            saved_fingerprint: String::new(),
            pending_delete: None,
            preview_generation: 0,
        };
        state.mark_clean();
        state
    }
}

impl SessionState {
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// The current status, unless it has expired.
    pub fn visible_status(&self, now: DateTime<Utc>, ttl: Duration) -> Option<&StatusMessage> {
        self.status.as_ref().filter(|s| s.is_visible(now, ttl))
    }

    pub fn autosave_enabled(&self) -> bool {
        self.autosave
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn saved_revision(&self) -> u64 {
        self.saved_revision
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    /// Bumped on manual refresh; the preview remounts when it changes.
    pub fn preview_generation(&self) -> u64 {
        self.preview_generation
    }

    pub fn file_tree(&self) -> Vec<FileTreeNode> {
        self.tree.project()
    }

    /// blake3 digest of the serialized files and config, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        match serde_json::to_vec(&(self.tree.entries(), &self.config)) {
            Ok(bytes) => {
                hasher.update(&bytes);
            }
            Err(e) => tracing::warn!("Fingerprint serialization failed: {}", e),
        }
        hex::encode(hasher.finalize().as_bytes())
    }

    /// True when content changed since the last save or load.
    pub fn is_dirty(&self) -> bool {
        self.revision > self.saved_revision && self.fingerprint() != self.saved_fingerprint
    }

    pub fn snapshot_for_save(&self) -> SaveSnapshot {
        SaveSnapshot {
            project_id: self.project_id.clone(),
            tree: self.tree.clone(),
            config: self.config.clone(),
            revision: self.revision,
            fingerprint: self.fingerprint(),
        }
    }

    /// Apply one action. On failure the state is unchanged apart from an
    /// error status, and the error is returned.
    pub fn apply(&mut self, action: Action) -> Result<(), SessionError> {
        match self.apply_inner(action) {
            Ok(()) => Ok(()),
            Err(e) => {
                let text = match &e {
                    SessionError::Tree(tree) => format!("Error: {}", tree),
                    other => other.to_string(),
                };
                self.post(StatusKind::Error, text);
                Err(e)
            }
        }
    }

    fn apply_inner(&mut self, action: Action) -> Result<(), SessionError> {
        match action {
            Action::SelectFile(path) => self.tree.select(&path)?,
            Action::Create { path, kind } => {
                let inserted = self.tree.create(&path, kind)?;
                self.touch();
                let text = match kind {
                    NodeKind::File => format!("File {} created.", inserted),
                    NodeKind::Folder => format!(
                        "Folder {} created with placeholder.",
                        crate::tree::path::dirname(&inserted)
                    ),
                };
                self.post(StatusKind::Success, text);
            }
            Action::RequestDelete { path, kind } => {
                let targets = self.tree.delete_targets(&path, kind)?;
                let path = crate::tree::path::normalize(&path)?;
                self.post(
                    StatusKind::Info,
                    format!(
                        "Delete {}? {} file(s) will be removed.",
                        path,
                        targets.len()
                    ),
                );
                self.pending_delete = Some(PendingDelete {
                    path,
                    kind,
                    targets,
                });
            }
            Action::ConfirmDelete => {
                let pending = self
                    .pending_delete
                    .take()
                    .ok_or(SessionError::NoPendingDelete)?;
                self.tree.delete(&pending.path, pending.kind)?;
                self.touch();
                let label = match pending.kind {
                    NodeKind::File => "File",
                    NodeKind::Folder => "Folder",
                };
                self.post(
                    StatusKind::Success,
                    format!("{} deleted: {}", label, pending.path),
                );
            }
            Action::CancelDelete => {
                self.pending_delete
                    .take()
                    .ok_or(SessionError::NoPendingDelete)?;
                self.status = None;
            }
            Action::Rename { path, new_name } => {
                let new_path = self.tree.rename(&path, &new_name)?;
                self.touch();
                let old_path = crate::tree::path::normalize(&path)?;
                self.post(
                    StatusKind::Success,
                    format!("{} renamed to {}", old_path, new_path),
                );
            }
            Action::Edit { path, code } => {
                self.tree.edit(&path, code)?;
                self.touch();
            }
            Action::UpdateDependencies(raw) => {
                match serde_json::from_str::<serde_json::Value>(&raw) {
                    Ok(serde_json::Value::Object(_)) => {}
                    Ok(_) => {
                        return Err(SessionError::InvalidDependencies(
                            "expected a JSON object".to_string(),
                        ))
                    }
                    Err(e) => return Err(SessionError::InvalidDependencies(e.to_string())),
                }
                self.config.dependencies_json = raw;
                self.touch();
                self.post(StatusKind::Success, "Configuration saved successfully.");
            }
            Action::SetOption { key, value } => {
                self.config.options.insert(key, value);
                self.touch();
            }
            Action::SetAutosave(enabled) => {
                self.autosave = enabled;
                let text = if enabled {
                    "Autosave enabled"
                } else {
                    "Autosave disabled"
                };
                self.post(StatusKind::Info, text);
            }
            Action::LoadStarted(project_id) => {
                self.phase = SessionPhase::Loading;
                self.post(
                    StatusKind::Loading,
                    format!("Loading project {}...", project_id),
                );
            }
            Action::LoadSucceeded(project) => {
                let text = format!("Project {} loaded successfully.", project.project_id);
                self.replace_project(project.project_id, FileTree::new(project.files), project.config);
                self.post(StatusKind::Success, text);
            }
            Action::LoadFailed(message) => {
                self.replace_project(
                    DEFAULT_PROJECT_ID.to_string(),
                    FileTree::new(default_files()),
                    default_config(),
                );
                self.post(StatusKind::Error, message);
            }
            Action::SaveStarted => {
                self.phase = SessionPhase::Saving;
                self.post(
                    StatusKind::Loading,
                    format!("Saving project {}...", self.project_id),
                );
            }
            Action::SaveSucceeded {
                project_id,
                revision,
                fingerprint,
            } => {
                self.finish_save();
                if project_id == self.project_id && revision >= self.saved_revision {
                    self.saved_revision = revision;
                    self.saved_fingerprint = fingerprint;
                }
                self.post(
                    StatusKind::Success,
                    format!("Project {} saved successfully!", project_id),
                );
            }
            Action::SaveFailed(message) => {
                self.finish_save();
                self.post(StatusKind::Error, message);
            }
            Action::Refresh => {
                self.preview_generation += 1;
                self.post(StatusKind::Info, "Preview refreshed manually.");
            }
            Action::ClearStatus => self.status = None,
        }
        Ok(())
    }

    /// A load started mid-save keeps the session in `Loading`.
    fn finish_save(&mut self) {
        if self.phase == SessionPhase::Saving {
            self.phase = SessionPhase::Ready;
        }
    }

    fn replace_project(&mut self, project_id: String, tree: FileTree, config: ProjectConfig) {
        self.project_id = project_id;
        self.tree = tree;
        self.config = config;
        self.phase = SessionPhase::Ready;
        self.pending_delete = None;
        self.revision += 1;
        self.mark_clean();
    }

    fn mark_clean(&mut self) {
        self.saved_revision = self.revision;
        self.saved_fingerprint = self.fingerprint();
    }

    fn touch(&mut self) {
        self.revision += 1;
        // A structural change invalidates whatever delete was awaiting confirmation.
        self.pending_delete = None;
    }

    fn post(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
            posted_at: Utc::now(),
        });
    }
}
