//! Persistence backends for the tracker state
//!
//! The state is one record, read at startup and overwritten on every change.

use parking_lot::Mutex;
use std::sync::Arc;

use stint_storage::Database;

use crate::session::TrackerState;
use crate::Result;

pub const DEFAULT_STATE_KEY: &str = "tracker_state";

/// Load/save interface for the whole tracker state
pub trait StateStore: Send + Sync {
    fn load(&self) -> Result<TrackerState>;
    fn save(&self, state: &TrackerState) -> Result<()>;
}

/// SQLite-backed store, one JSON record under a fixed key
pub struct SqliteStateStore {
    db: Database,
    key: String,
}

impl SqliteStateStore {
    pub fn new(db: Database) -> Self {
        Self::with_key(db, DEFAULT_STATE_KEY)
    }

    pub fn with_key(db: Database, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
        }
    }
}

impl StateStore for SqliteStateStore {
    fn load(&self) -> Result<TrackerState> {
        let Some(json) = self.db.get_record(&self.key)? else {
            tracing::info!(key = %self.key, "No persisted state, starting empty");
            return Ok(TrackerState::default());
        };

        match serde_json::from_str::<TrackerState>(&json) {
            Ok(state) => {
                tracing::info!(
                    key = %self.key,
                    session_count = state.sessions.len(),
                    "Loaded persisted state"
                );
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Persisted state unreadable, starting empty");
                Ok(TrackerState::default())
            }
        }
    }

    fn save(&self, state: &TrackerState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.db.set_record(&self.key, &json)?;
        tracing::debug!(key = %self.key, session_count = state.sessions.len(), "Saved state");
        Ok(())
    }
}

/// In-memory store for tests and `--in-memory` runs
#[derive(Clone, Default)]
pub struct MemoryStateStore {
    state: Arc<Mutex<Option<TrackerState>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: TrackerState) -> Self {
        Self {
            state: Arc::new(Mutex::new(Some(state))),
            saves: Arc::new(Mutex::new(0)),
        }
    }

    /// Last saved state, if any save happened
    pub fn snapshot(&self) -> Option<TrackerState> {
        self.state.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<TrackerState> {
        Ok(self.state.lock().clone().unwrap_or_default())
    }

    fn save(&self, state: &TrackerState) -> Result<()> {
        *self.state.lock() = Some(state.clone());
        *self.saves.lock() += 1;
        Ok(())
    }
}
