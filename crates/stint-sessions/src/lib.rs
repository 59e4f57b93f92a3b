//! Stint Session Store
//!
//! - A Session is a named, finished stretch of time in milliseconds
//! - The session list is ordered; display order is manipulation order
//! - Every mutation flushes the whole tracker state to storage
//! - Flushes are asynchronous but issued in mutation order

mod error;
mod flusher;
mod persistence;
mod session;
mod store;

pub use error::SessionError;
pub use flusher::Flusher;
pub use persistence::{MemoryStateStore, SqliteStateStore, StateStore, DEFAULT_STATE_KEY};
pub use session::{Direction, Preferences, Session, TrackerState};
pub use store::SessionStore;

pub type Result<T> = std::result::Result<T, SessionError>;
