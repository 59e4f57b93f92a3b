//! Stint Core
//!
//! Central coordination for the session tracker.
//! The UI is stateless; every request goes through the `Dispatcher`.

mod config;
mod dispatcher;
mod error;
mod export;
mod protocol;
mod tracker;

pub use config::Config;
pub use dispatcher::{Dispatcher, NEW_SESSION_NAME};
pub use error::CoreError;
pub use export::{export_markdown, EXPORT_HEADER};
pub use protocol::{Request, Response, Status};
pub use tracker::Tracker;

// Re-export core components
pub use stint_sessions::{
    Direction, Flusher, MemoryStateStore, Preferences, Session, SessionError, SessionStore,
    SqliteStateStore, StateStore, TrackerState,
};
pub use stint_storage::{Database, StorageError};
pub use stint_timer::{format_time, parse_time, Clock, ManualClock, SystemClock, Timer};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// Events go to stderr; stdout is reserved for protocol responses.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
