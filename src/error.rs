//! Error types for the playground backend, file-tree model and session layer.

use thiserror::Error;

/// Errors raised by structural operations on the virtual file tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("File/Folder {0} already exists.")]
    AlreadyExists(String),

    #[error("Cannot modify core project file: {0}")]
    Protected(String),

    #[error("Invalid or existing new path: {0}")]
    InvalidTarget(String),

    #[error("No file or folder at {0}")]
    NotFound(String),

    #[error("File {0} is read-only")]
    ReadOnly(String),
}

/// Storage-layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Errors surfaced by the project service and the HTTP layer.
///
/// Each variant maps to one response status; see `server::error`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Errors returned by a `ProjectClient`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(String),

    /// Non-success response; `message` is the server's own message when present.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// Errors from applying session actions.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Invalid JSON format for Dependencies: {0}")]
    InvalidDependencies(String),

    #[error("No delete is awaiting confirmation")]
    NoPendingDelete,
}

impl From<ApiError> for ClientError {
    /// In-process calls see the same status and message an HTTP caller would.
    fn from(err: ApiError) -> Self {
        let status = err.status_code();
        let message = if status.is_server_error() {
            tracing::error!("Project service failure: {}", err);
            crate::server::error::SERVER_ERROR.to_string()
        } else {
            err.to_string()
        };
        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
