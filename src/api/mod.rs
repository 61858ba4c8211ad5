//! Project API
//!
//! Stateless handlers behind the `/api/projects` endpoints. Each call checks
//! the caller-asserted identity, validates its fields, and scopes the store
//! operation by `(projectId, userId)`. Files and config travel as JSON and are
//! kept in the store as their serialized strings.

pub mod types;

use crate::error::{ApiError, StorageError};
use crate::store::{ProjectKey, ProjectRecord, ProjectStore};
use crate::types::ProjectSummary;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

pub use types::{
    DeleteRequest, ListRequest, LoadRequest, LoadResponse, MessageResponse, SaveRequest,
    SaveResponse,
};

const MISSING_IDENTITY: &str = "Authentication context (userId) required.";

pub struct ProjectApi {
    store: Arc<dyn ProjectStore>,
    assets_bucket: Option<String>,
}

impl ProjectApi {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self {
            store,
            assets_bucket: None,
        }
    }

    /// Attach an asset bucket; saved records then carry an `s3://` link.
    pub fn with_assets_bucket(mut self, bucket: Option<String>) -> Self {
        self.assets_bucket = bucket.filter(|b| !b.is_empty());
        self
    }

    /// Create or fully overwrite the caller's project.
    pub fn save(&self, request: SaveRequest) -> Result<SaveResponse, ApiError> {
        let user_id = authenticate(request.user_id.as_deref())?;
        let project_id = non_empty(request.project_id.as_deref());
        let files = request.files.filter(is_file_mapping);
        let (project_id, files) = match (project_id, files) {
            (Some(project_id), Some(files)) => (project_id, files),
            _ => {
                return Err(ApiError::ValidationError(
                    "Missing required fields: projectId, userId, files.".to_string(),
                ))
            }
        };
        let config = request
            .config
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        let record = ProjectRecord {
            project_id: project_id.to_string(),
            user_id: user_id.to_string(),
            files: serde_json::to_string(&files).map_err(StorageError::from)?,
            config: serde_json::to_string(&config).map_err(StorageError::from)?,
            updated_at: Utc::now(),
            s3_assets_link: self
                .assets_bucket
                .as_ref()
                .map(|bucket| format!("s3://{}/{}/{}", bucket, user_id, project_id)),
        };

        self.store
            .upsert(&record)
            .map_err(|e| store_failure("save", e))?;
        info!(project_id, user_id, "project saved");

        Ok(SaveResponse {
            message: "Project saved successfully".to_string(),
            project: record.summary(),
        })
    }

    pub fn load(&self, request: LoadRequest) -> Result<LoadResponse, ApiError> {
        let user_id = authenticate(request.user_id.as_deref())?;
        let project_id = non_empty(request.project_id.as_deref()).ok_or_else(|| {
            ApiError::ValidationError("Missing required field: projectId.".to_string())
        })?;

        let record = self
            .store
            .find(&ProjectKey::new(user_id, project_id))
            .map_err(|e| store_failure("load", e))?
            .ok_or_else(|| ApiError::NotFound("Project not found.".to_string()))?;

        let files: Value = serde_json::from_str(&record.files)
            .map_err(|e| store_failure("load", e.into()))?;
        let config: Value = serde_json::from_str(&record.config)
            .map_err(|e| store_failure("load", e.into()))?;

        Ok(LoadResponse {
            project_id: record.project_id,
            files,
            config,
            updated_at: record.updated_at,
        })
    }

    /// The caller's projects, most recently saved first.
    pub fn list(&self, request: ListRequest) -> Result<Vec<ProjectSummary>, ApiError> {
        let user_id = authenticate(request.user_id.as_deref())?;
        self.store
            .list_for_user(user_id)
            .map_err(|e| store_failure("list", e))
    }

    pub fn delete(&self, request: DeleteRequest) -> Result<MessageResponse, ApiError> {
        let user_id = authenticate(request.user_id.as_deref())?;
        let project_id = non_empty(request.project_id.as_deref()).ok_or_else(|| {
            ApiError::ValidationError("Missing required field: projectId.".to_string())
        })?;

        let removed = self
            .store
            .delete(&ProjectKey::new(user_id, project_id))
            .map_err(|e| store_failure("delete", e))?;
        if !removed {
            return Err(ApiError::NotFound(
                "Project not found or not owned by user.".to_string(),
            ));
        }
        info!(project_id, user_id, "project deleted");
        Ok(MessageResponse::new("Project deleted successfully."))
    }
}

/// Placeholder identity check: the caller asserts its own user id.
fn authenticate(user_id: Option<&str>) -> Result<&str, ApiError> {
    non_empty(user_id).ok_or_else(|| ApiError::Unauthenticated(MISSING_IDENTITY.to_string()))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// `files` must be a non-empty path-to-entry object.
fn is_file_mapping(value: &Value) -> bool {
    matches!(value, Value::Object(map) if !map.is_empty())
}

fn store_failure(operation: &'static str, err: StorageError) -> ApiError {
    error!(operation, error = %err, "project store failure");
    ApiError::StorageError(err)
}
