//! Session controller
//!
//! Owns the [`SessionState`] and sequences load, save and autosave against a
//! [`ProjectClient`]. The state lock is never held across a client call.

use super::client::{HttpProjectClient, ProjectClient};
use super::state::{Action, SessionPhase, SessionState, StatusMessage};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::types::ProjectSummary;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

const MIN_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub default_project_id: String,
    pub autosave_interval: Duration,
    pub status_ttl: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for SessionSettings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            default_project_id: config.default_project_id.clone(),
            autosave_interval: config.autosave_interval(),
            status_ttl: config.status_ttl(),
        }
    }
}

struct SessionCore {
    client: Arc<dyn ProjectClient>,
    state: tokio::sync::Mutex<SessionState>,
}

impl SessionCore {
    async fn apply(&self, action: Action) -> Result<(), SessionError> {
        self.state.lock().await.apply(action)
    }

    async fn load(&self, project_id: &str) -> Result<(), SessionError> {
        self.apply(Action::LoadStarted(project_id.to_string())).await?;
        match self.client.load(project_id).await {
            Ok(project) => {
                info!(project_id = %project.project_id, "project loaded");
                self.apply(Action::LoadSucceeded(project)).await
            }
            Err(e) => {
                warn!(project_id, "project load failed: {}", e);
                self.apply(Action::LoadFailed(e.to_string())).await?;
                Err(e.into())
            }
        }
    }

    async fn save(&self) -> Result<ProjectSummary, SessionError> {
        let snapshot = {
            let mut state = self.state.lock().await;
            let snapshot = state.snapshot_for_save();
            state.apply(Action::SaveStarted)?;
            snapshot
        };

        match self
            .client
            .save(&snapshot.project_id, snapshot.tree.entries(), &snapshot.config)
            .await
        {
            Ok(summary) => {
                self.apply(Action::SaveSucceeded {
                    project_id: snapshot.project_id,
                    revision: snapshot.revision,
                    fingerprint: snapshot.fingerprint,
                })
                .await?;
                Ok(summary)
            }
            Err(e) => {
                warn!(project_id = %snapshot.project_id, "project save failed: {}", e);
                self.apply(Action::SaveFailed(e.to_string())).await?;
                Err(e.into())
            }
        }
    }

    async fn autosave_tick(&self) -> Result<bool, SessionError> {
        let due = {
            let state = self.state.lock().await;
            state.autosave_enabled() && state.phase() == SessionPhase::Ready && state.is_dirty()
        };
        if !due {
            return Ok(false);
        }
        debug!("autosave triggered");
        self.save().await.map(|_| true)
    }
}

/// Aborts the autosave task when dropped.
struct AutosaveHandle {
    task: JoinHandle<()>,
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn spawn_autosave(core: Weak<SessionCore>, interval: Duration) -> AutosaveHandle {
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(MIN_AUTOSAVE_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let Some(core) = core.upgrade() else {
                break;
            };
            if let Err(e) = core.autosave_tick().await {
                warn!("autosave failed: {}", e);
            }
        }
    });
    AutosaveHandle { task }
}

/// Cloneable handle to one editor session.
#[derive(Clone)]
pub struct SessionController {
    core: Arc<SessionCore>,
    autosave: Arc<Mutex<Option<AutosaveHandle>>>,
    settings: Arc<SessionSettings>,
}

impl SessionController {
    pub fn new(client: Arc<dyn ProjectClient>, settings: SessionSettings) -> Self {
        Self {
            core: Arc::new(SessionCore {
                client,
                state: tokio::sync::Mutex::new(SessionState::default()),
            }),
            autosave: Arc::new(Mutex::new(None)),
            settings: Arc::new(settings),
        }
    }

    /// Controller talking HTTP to `config.api_base` as `config.user_id`.
    pub fn connect(config: &SessionConfig) -> Self {
        let client = HttpProjectClient::new(config.api_base.clone(), config.user_id.clone());
        Self::new(Arc::new(client), SessionSettings::from(config))
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Initial load of the configured default project.
    pub async fn mount(&self) -> Result<(), SessionError> {
        self.core.load(&self.settings.default_project_id).await
    }

    /// Load `project_id`; on failure the session falls back to the built-in project.
    pub async fn load_project(&self, project_id: &str) -> Result<(), SessionError> {
        self.core.load(project_id).await
    }

    /// Save the current files and config under the current project id.
    pub async fn save_project(&self) -> Result<ProjectSummary, SessionError> {
        self.core.save().await
    }

    /// One autosave check; returns whether a save was issued.
    pub async fn autosave_tick(&self) -> Result<bool, SessionError> {
        self.core.autosave_tick().await
    }

    pub async fn set_autosave(&self, enabled: bool) -> Result<(), SessionError> {
        self.dispatch(Action::SetAutosave(enabled)).await
    }

    pub fn autosave_running(&self) -> bool {
        self.autosave.lock().is_some()
    }

    pub async fn dispatch(&self, action: Action) -> Result<(), SessionError> {
        let autosave = match &action {
            Action::SetAutosave(enabled) => Some(*enabled),
            _ => None,
        };
        self.core.apply(action).await?;
        if let Some(enabled) = autosave {
            self.sync_autosave(enabled);
        }
        Ok(())
    }

    fn sync_autosave(&self, enabled: bool) {
        let mut slot = self.autosave.lock();
        match (enabled, slot.is_some()) {
            (true, false) => {
                info!(interval = ?self.settings.autosave_interval, "autosave enabled");
                *slot = Some(spawn_autosave(
                    Arc::downgrade(&self.core),
                    self.settings.autosave_interval,
                ));
            }
            (false, true) => {
                info!("autosave disabled");
                *slot = None;
            }
            _ => {}
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.core.state.lock().await.clone()
    }

    /// Current status message, unless expired.
    pub async fn visible_status(&self) -> Option<StatusMessage> {
        let state = self.core.state.lock().await;
        state
            .visible_status(Utc::now(), self.settings.status_ttl)
            .cloned()
    }

    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>, SessionError> {
        Ok(self.core.client.list().await?)
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<String, SessionError> {
        Ok(self.core.client.delete(project_id).await?)
    }
}
