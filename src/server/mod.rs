//! HTTP surface
//!
//! Exposes [`ProjectApi`] as JSON POST endpoints under `/api/projects`.
//! Store calls run on the blocking pool since sled flushes on every write.

pub mod error;

use crate::api::{
    DeleteRequest, ListRequest, LoadRequest, LoadResponse, MessageResponse, ProjectApi,
    SaveRequest, SaveResponse,
};
use crate::error::ApiError;
use crate::types::ProjectSummary;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub const PROJECTS_ROUTE: &str = "/api/projects";

type ApiState = State<Arc<ProjectApi>>;

/// Build the application router.
pub fn router(api: Arc<ProjectApi>) -> Router {
    let projects = Router::new()
        .route("/save", post(save))
        .route("/load", post(load))
        .route("/list", post(list))
        .route("/delete", post(delete));

    Router::new()
        .route("/", get(welcome))
        .nest(PROJECTS_ROUTE, projects)
        .with_state(api)
}

/// Serve until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    api: Arc<ProjectApi>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "project API listening");
    }
    axum::serve(listener, router(api))
        .with_graceful_shutdown(shutdown)
        .await
}

/// A server running on a background task.
pub struct RunningServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    /// Bind `addr` and serve on a spawned task.
    pub async fn start(addr: SocketAddr, api: Arc<ProjectApi>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(listener, api, async move {
            let _ = rx.await;
        }));
        Ok(Self {
            addr,
            shutdown: Some(tx),
            handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Signal graceful shutdown and wait for the server task.
    pub async fn stop(mut self) -> std::io::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match (&mut self.handle).await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::new(std::io::ErrorKind::Other, e)),
        }
    }
}

async fn on_blocking_pool<T, F>(api: Arc<ProjectApi>, call: F) -> Result<T, ApiError>
where
    F: FnOnce(&ProjectApi) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || call(&api))
        .await
        .map_err(|e| ApiError::Internal(format!("request task failed: {}", e)))?
}

async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the Playground API"))
}

async fn save(
    State(api): ApiState,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, ApiError> {
    let Json(request) = payload?;
    debug!(project_id = ?request.project_id, "save request");
    on_blocking_pool(api, move |api| api.save(request))
        .await
        .map(Json)
}

async fn load(
    State(api): ApiState,
    payload: Result<Json<LoadRequest>, JsonRejection>,
) -> Result<Json<LoadResponse>, ApiError> {
    let Json(request) = payload?;
    debug!(project_id = ?request.project_id, "load request");
    on_blocking_pool(api, move |api| api.load(request))
        .await
        .map(Json)
}

async fn list(
    State(api): ApiState,
    payload: Result<Json<ListRequest>, JsonRejection>,
) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    let Json(request) = payload?;
    on_blocking_pool(api, move |api| api.list(request))
        .await
        .map(Json)
}

async fn delete(
    State(api): ApiState,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;
    debug!(project_id = ?request.project_id, "delete request");
    on_blocking_pool(api, move |api| api.delete(request))
        .await
        .map(Json)
}
