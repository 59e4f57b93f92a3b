//! Session Store
//!
//! Owns the ordered session list and preferences.
//! Every successful mutation queues a flush of the whole state.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::SessionError;
use crate::flusher::Flusher;
use crate::persistence::StateStore;
use crate::session::{Direction, Preferences, Session, TrackerState};
use crate::Result;

pub struct SessionStore {
    /// In-memory state, the source of truth while the process runs
    state: Arc<RwLock<TrackerState>>,
    /// Ordered writer for persistence
    flusher: Flusher,
}

impl SessionStore {
    pub fn new(state: TrackerState, flusher: Flusher) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            flusher,
        }
    }

    /// Store without persistence
    pub fn in_memory() -> Self {
        Self::new(TrackerState::default(), Flusher::detached())
    }

    /// Load persisted state and flush future mutations through `flusher`
    pub fn load(persistence: &dyn StateStore, flusher: Flusher) -> Result<Self> {
        let state = persistence.load()?;
        tracing::info!(
            session_count = state.sessions.len(),
            dark_mode = state.preferences.dark_mode,
            continuous_timing = state.preferences.continuous_timing,
            "Initialized session store"
        );
        Ok(Self::new(state, flusher))
    }

    pub fn flusher(&self) -> &Flusher {
        &self.flusher
    }

    /// Current sessions in display order
    pub fn list(&self) -> Vec<Session> {
        self.state.read().sessions.clone()
    }

    pub fn get(&self, index: usize) -> Option<Session> {
        self.state.read().sessions.get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.read().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().sessions.is_empty()
    }

    pub fn state(&self) -> TrackerState {
        self.state.read().clone()
    }

    /// Append a session to the end of the list
    pub fn add(&self, name: String, elapsed: u64) -> Session {
        let session = Session::new(name, elapsed);

        let mut state = self.state.write();
        state.sessions.push(session.clone());
        self.flusher.enqueue(state.clone());

        tracing::info!(
            index = state.sessions.len() - 1,
            name = %session.name,
            elapsed = session.elapsed,
            "Added session"
        );

        session
    }

    /// Rename a session and optionally replace its elapsed time
    pub fn edit(&self, index: usize, new_name: String, new_elapsed: Option<u64>) -> Result<Session> {
        let mut state = self.state.write();
        let len = state.sessions.len();
        let session = state
            .sessions
            .get_mut(index)
            .ok_or_else(|| invalid_index(index, len))?;

        session.name = new_name;
        if let Some(elapsed) = new_elapsed {
            session.elapsed = elapsed;
        }
        let updated = session.clone();
        self.flusher.enqueue(state.clone());

        tracing::info!(
            index,
            name = %updated.name,
            elapsed = updated.elapsed,
            "Edited session"
        );

        Ok(updated)
    }

    /// Remove a session, shifting later sessions down by one
    pub fn delete(&self, index: usize) -> Result<Session> {
        let mut state = self.state.write();
        let len = state.sessions.len();
        if index >= len {
            return Err(invalid_index(index, len));
        }

        let removed = state.sessions.remove(index);
        self.flusher.enqueue(state.clone());

        tracing::info!(index, name = %removed.name, "Deleted session");

        Ok(removed)
    }

    /// Swap a session with its neighbor in `direction`
    pub fn move_session(&self, index: usize, direction: Direction) -> Result<()> {
        let mut state = self.state.write();
        let len = state.sessions.len();
        if index >= len {
            return Err(invalid_index(index, len));
        }

        let neighbor = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < len => index + 1,
            _ => return Err(SessionError::CannotMove { index, direction }),
        };

        state.sessions.swap(index, neighbor);
        self.flusher.enqueue(state.clone());

        tracing::info!(from = index, to = neighbor, %direction, "Moved session");

        Ok(())
    }

    pub fn preferences(&self) -> Preferences {
        self.state.read().preferences
    }

    /// Update the given preferences, leaving `None` fields untouched
    pub fn update_preferences(
        &self,
        dark_mode: Option<bool>,
        continuous_timing: Option<bool>,
    ) -> Preferences {
        let mut state = self.state.write();
        if let Some(enabled) = dark_mode {
            state.preferences.dark_mode = enabled;
        }
        if let Some(enabled) = continuous_timing {
            state.preferences.continuous_timing = enabled;
        }
        let preferences = state.preferences;
        self.flusher.enqueue(state.clone());

        tracing::info!(
            dark_mode = preferences.dark_mode,
            continuous_timing = preferences.continuous_timing,
            "Updated preferences"
        );

        preferences
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            flusher: self.flusher.clone(),
        }
    }
}

fn invalid_index(index: usize, len: usize) -> SessionError {
    SessionError::InvalidIndex {
        index: i64::try_from(index).unwrap_or(i64::MAX),
        len,
    }
}
