//! Application state management
use parking_lot::Mutex;
use std::sync::Arc;

use stint_core::{Config, Response, Result, Tracker};

/// Thread-safe wrapper that serializes requests through one tracker
#[derive(Clone)]
pub struct AppState {
    tracker: Arc<Mutex<Tracker>>,
}

impl AppState {
    pub fn new(config: Config, in_memory: bool) -> Result<Self> {
        let tracker = if in_memory {
            Tracker::in_memory(config)?
        } else {
            Tracker::open(config)?
        };

        Ok(Self::from_tracker(tracker))
    }

    pub fn from_tracker(tracker: Tracker) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }

    pub fn with_tracker<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Tracker) -> T,
    {
        let guard = self.tracker.lock();
        f(&guard)
    }

    /// Handle one request line while holding the tracker lock
    pub fn handle_line(&self, line: &str) -> Response {
        self.with_tracker(|tracker| tracker.handle_json(line))
    }

    pub fn flusher(&self) -> stint_core::Flusher {
        self.with_tracker(|tracker| tracker.store().flusher().clone())
    }
}
