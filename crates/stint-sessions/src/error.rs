//! Session error types

use thiserror::Error;

use crate::session::Direction;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid session index")]
    InvalidIndex { index: i64, len: usize },

    #[error("Cannot move session")]
    CannotMove { index: usize, direction: Direction },

    #[error("Storage error: {0}")]
    Storage(#[from] stint_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Flush task failed: {0}")]
    FlushTask(String),
}
