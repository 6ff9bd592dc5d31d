//! Error types for tm
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, empty text, uninitialized workspace)
//! - 3: Not found (unknown task or workspace id)
//! - 4: Operation failed (filesystem, malformed storage)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for tm CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tm operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Workspace not initialized: {0}")]
    NotInitialized(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Task {0} is already archived")]
    TaskAlreadyArchived(u32),

    #[error("Workspace {id} is already {status}")]
    InvalidTransition { id: u32, status: String },

    // Not found (exit code 3)
    #[error("Task not found: {0}")]
    TaskNotFound(u32),

    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(u32),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidArgument(_)
            | Error::NotInitialized(_)
            | Error::InvalidConfig(_)
            | Error::TaskAlreadyArchived(_)
            | Error::InvalidTransition { .. } => exit_codes::USER_ERROR,

            // Missing ids
            Error::TaskNotFound(_) | Error::WorkspaceNotFound(_) => exit_codes::NOT_FOUND,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        use serde_json::json;

        match self {
            Error::TaskNotFound(id) | Error::TaskAlreadyArchived(id) => {
                Some(json!({ "task_id": id }))
            }
            Error::WorkspaceNotFound(id) => Some(json!({ "workspace_id": id })),
            Error::InvalidTransition { id, status } => {
                Some(json!({ "workspace_id": id, "status": status }))
            }
            Error::NotInitialized(path) => Some(json!({ "path": path })),
            Error::InvalidArgument(message)
            | Error::InvalidConfig(message)
            | Error::OperationFailed(message) => Some(json!({ "message": message })),
            Error::Io(_) | Error::Json(_) | Error::TomlParse(_) => None,
        }
    }
}

/// Result type alias for tm operations
pub type Result<T> = std::result::Result<T, Error>;
