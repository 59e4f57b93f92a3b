//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] stint_storage::StorageError),

    /// Shown to the UI verbatim, so no prefix
    #[error(transparent)]
    Session(#[from] stint_sessions::SessionError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}
