//! Main tracker state container
//!
//! Owns the session store, the timer and the flush worker. Must be built
//! inside a tokio runtime because the flush worker is spawned on it.

use std::sync::Arc;

use stint_sessions::{
    Flusher, MemoryStateStore, SessionStore, SqliteStateStore, StateStore,
};
use stint_storage::Database;
use stint_timer::Timer;

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::protocol::{Request, Response};
use crate::Result;

pub struct Tracker {
    config: Config,
    dispatcher: Dispatcher,
}

impl Tracker {
    /// Open the SQLite-backed tracker described by `config`
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let db = Database::open(&config.database_path)?;
        let persistence = Arc::new(SqliteStateStore::with_key(db, config.state_key.clone()));
        Self::with_persistence(config, persistence, Timer::new())
    }

    /// Tracker whose state lives only as long as the process
    pub fn in_memory(config: Config) -> Result<Self> {
        Self::with_persistence(config, Arc::new(MemoryStateStore::new()), Timer::new())
    }

    pub fn with_persistence(
        config: Config,
        persistence: Arc<dyn StateStore>,
        timer: Timer,
    ) -> Result<Self> {
        let flusher = Flusher::spawn(Arc::clone(&persistence));
        let store = SessionStore::load(persistence.as_ref(), flusher)?;
        let dispatcher = Dispatcher::new(store, timer).with_record_on_stop(config.record_on_stop);

        tracing::info!(
            database = %config.database_path.display(),
            record_on_stop = config.record_on_stop,
            "Tracker initialized"
        );

        Ok(Self { config, dispatcher })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn store(&self) -> &SessionStore {
        self.dispatcher.store()
    }

    pub fn handle(&self, request: Request) -> Response {
        self.dispatcher.handle(request)
    }

    pub fn handle_json(&self, raw: &str) -> Response {
        self.dispatcher.handle_json(raw)
    }

    /// Wait for every queued flush to be written
    pub async fn sync(&self) {
        self.store().flusher().sync().await;
    }

    /// Write pending state and stop the flush worker
    pub async fn shutdown(&self) {
        self.store().flusher().shutdown().await;
        tracing::info!("Tracker shut down");
    }
}
