//! Project client contract and adapters.
//!
//! The session talks to the project service through [`ProjectClient`]:
//! over HTTP in a deployed setup, or directly against an in-process
//! [`ProjectApi`].

use crate::api::{
    DeleteRequest, ListRequest, LoadRequest, LoadResponse, MessageResponse, ProjectApi,
    SaveRequest, SaveResponse,
};
use crate::defaults::default_config;
use crate::error::{ApiError, ClientError};
use crate::tree::path;
use crate::types::{FileMap, ProjectConfig, ProjectSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// A project as the session consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProject {
    pub project_id: String,
    pub files: FileMap,
    pub config: ProjectConfig,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<LoadResponse> for LoadedProject {
    type Error = ClientError;

    fn try_from(response: LoadResponse) -> Result<Self, Self::Error> {
        let raw: FileMap = serde_json::from_value(response.files)
            .map_err(|e| ClientError::Decode(format!("files: {}", e)))?;
        let files = normalize_keys(raw)?;
        let config = match response.config {
            Value::Null => default_config(),
            other => serde_json::from_value(other)
                .map_err(|e| ClientError::Decode(format!("config: {}", e)))?,
        };
        Ok(Self {
            project_id: response.project_id,
            files,
            config,
            updated_at: response.updated_at,
        })
    }
}

/// Rewrite every key to the `/a/b` form; empty or colliding keys are rejected.
fn normalize_keys(raw: FileMap) -> Result<FileMap, ClientError> {
    let mut files = FileMap::new();
    for (key, entry) in raw {
        let normalized = path::normalize(&key)
            .map_err(|_| ClientError::Decode(format!("files: invalid path '{}'", key)))?;
        if files.contains_key(&normalized) {
            return Err(ClientError::Decode(format!(
                "files: '{}' collides with {}",
                key, normalized
            )));
        }
        files.insert(normalized, entry);
    }
    Ok(files)
}

/// Access to the project service on behalf of one user.
#[async_trait]
pub trait ProjectClient: Send + Sync {
    async fn load(&self, project_id: &str) -> Result<LoadedProject, ClientError>;

    async fn save(
        &self,
        project_id: &str,
        files: &FileMap,
        config: &ProjectConfig,
    ) -> Result<ProjectSummary, ClientError>;

    async fn list(&self) -> Result<Vec<ProjectSummary>, ClientError>;

    /// Returns the service's confirmation message.
    async fn delete(&self, project_id: &str) -> Result<String, ClientError>;
}

fn save_request(
    project_id: &str,
    user_id: &str,
    files: &FileMap,
    config: &ProjectConfig,
) -> Result<SaveRequest, ClientError> {
    let encode = |e: serde_json::Error| ClientError::Decode(e.to_string());
    Ok(SaveRequest {
        project_id: Some(project_id.to_string()),
        user_id: Some(user_id.to_string()),
        files: Some(serde_json::to_value(files).map_err(encode)?),
        config: Some(serde_json::to_value(config).map_err(encode)?),
    })
}

/// JSON-over-HTTP client for the `/api/projects` endpoints.
///
/// Every request body carries the configured `userId`.
#[derive(Debug, Clone)]
pub struct HttpProjectClient {
    http: reqwest::Client,
    base_url: String,
    user_id: String,
}

impl HttpProjectClient {
    /// `base_url` is the projects root, e.g. `http://127.0.0.1:3000/api/projects`.
    pub fn new(base_url: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, "project request");
        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<MessageResponse>(&bytes)
                .map(|body| body.message)
                .unwrap_or_else(|_| format!("API call failed with status {}", status.as_u16()));
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ProjectClient for HttpProjectClient {
    async fn load(&self, project_id: &str) -> Result<LoadedProject, ClientError> {
        let request = LoadRequest {
            project_id: Some(project_id.to_string()),
            user_id: Some(self.user_id.clone()),
        };
        let response: LoadResponse = self.post("load", &request).await?;
        response.try_into()
    }

    async fn save(
        &self,
        project_id: &str,
        files: &FileMap,
        config: &ProjectConfig,
    ) -> Result<ProjectSummary, ClientError> {
        let request = save_request(project_id, &self.user_id, files, config)?;
        let response: SaveResponse = self.post("save", &request).await?;
        Ok(response.project)
    }

    async fn list(&self) -> Result<Vec<ProjectSummary>, ClientError> {
        let request = ListRequest {
            user_id: Some(self.user_id.clone()),
        };
        self.post("list", &request).await
    }

    async fn delete(&self, project_id: &str) -> Result<String, ClientError> {
        let request = DeleteRequest {
            project_id: Some(project_id.to_string()),
            user_id: Some(self.user_id.clone()),
        };
        let response: MessageResponse = self.post("delete", &request).await?;
        Ok(response.message)
    }
}

/// In-process client calling a [`ProjectApi`] on the blocking pool.
#[derive(Clone)]
pub struct LocalProjectClient {
    api: Arc<ProjectApi>,
    user_id: String,
}

impl LocalProjectClient {
    pub fn new(api: Arc<ProjectApi>, user_id: impl Into<String>) -> Self {
        Self {
            api,
            user_id: user_id.into(),
        }
    }

    async fn call<T, F>(&self, call: F) -> Result<T, ClientError>
    where
        F: FnOnce(&ProjectApi) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let api = Arc::clone(&self.api);
        tokio::task::spawn_blocking(move || call(&api))
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?
            .map_err(ClientError::from)
    }
}

#[async_trait]
impl ProjectClient for LocalProjectClient {
    async fn load(&self, project_id: &str) -> Result<LoadedProject, ClientError> {
        let request = LoadRequest {
            project_id: Some(project_id.to_string()),
            user_id: Some(self.user_id.clone()),
        };
        self.call(move |api| api.load(request)).await?.try_into()
    }

    async fn save(
        &self,
        project_id: &str,
        files: &FileMap,
        config: &ProjectConfig,
    ) -> Result<ProjectSummary, ClientError> {
        let request = save_request(project_id, &self.user_id, files, config)?;
        let response = self.call(move |api| api.save(request)).await?;
        Ok(response.project)
    }

    async fn list(&self) -> Result<Vec<ProjectSummary>, ClientError> {
        let request = ListRequest {
            user_id: Some(self.user_id.clone()),
        };
        self.call(move |api| api.list(request)).await
    }

    async fn delete(&self, project_id: &str) -> Result<String, ClientError> {
        let request = DeleteRequest {
            project_id: Some(project_id.to_string()),
            user_id: Some(self.user_id.clone()),
        };
        let response = self.call(move |api| api.delete(request)).await?;
        Ok(response.message)
    }
}
