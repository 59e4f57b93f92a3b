//! Ordered background flushing of tracker state
//!
//! Mutations enqueue full snapshots; a single worker task writes them in
//! order. Snapshots queued back-to-back are coalesced into the newest one,
//! which is equivalent because every save overwrites the whole record.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::error::SessionError;
use crate::persistence::StateStore;
use crate::session::TrackerState;

enum FlushCommand {
    Save(TrackerState),
    Sync(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

/// Handle for queueing state snapshots to the flush worker
#[derive(Clone)]
pub struct Flusher {
    tx: Option<mpsc::UnboundedSender<FlushCommand>>,
}

impl Flusher {
    /// Spawn the flush worker on the current tokio runtime
    pub fn spawn(store: Arc<dyn StateStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_flush_loop(store, rx));
        Self { tx: Some(tx) }
    }

    /// A flusher that drops every snapshot (no persistence)
    pub fn detached() -> Self {
        Self { tx: None }
    }

    pub fn is_detached(&self) -> bool {
        self.tx.is_none()
    }

    /// Queue a snapshot without waiting for it to be written
    pub fn enqueue(&self, state: TrackerState) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(FlushCommand::Save(state)).is_err() {
            tracing::warn!("Flush worker stopped, state snapshot dropped");
        }
    }

    /// Wait until every snapshot queued before this call has been written
    pub async fn sync(&self) {
        self.send_control(FlushCommand::Sync).await;
    }

    /// Write pending snapshots, then stop the worker
    pub async fn shutdown(&self) {
        self.send_control(FlushCommand::Shutdown).await;
    }

    async fn send_control(&self, make: fn(oneshot::Sender<()>) -> FlushCommand) {
        let Some(tx) = &self.tx else {
            return;
        };
        let (ack_tx, ack_rx) = oneshot::channel();
        if tx.send(make(ack_tx)).is_err() {
            return;
        }
        let _ = ack_rx.await;
    }
}

async fn run_flush_loop(
    store: Arc<dyn StateStore>,
    mut rx: mpsc::UnboundedReceiver<FlushCommand>,
) {
    while let Some(first) = rx.recv().await {
        let mut latest = None;
        let mut control = None;
        let mut next = Some(first);

        while let Some(command) = next {
            match command {
                FlushCommand::Save(state) => latest = Some(state),
                other => {
                    control = Some(other);
                    break;
                }
            }
            next = rx.try_recv().ok();
        }

        if let Some(state) = latest {
            write_state(Arc::clone(&store), state).await;
        }

        match control {
            Some(FlushCommand::Sync(ack)) => {
                let _ = ack.send(());
            }
            Some(FlushCommand::Shutdown(ack)) => {
                let _ = ack.send(());
                break;
            }
            _ => {}
        }
    }

    tracing::debug!("Flush worker stopped");
}

async fn write_state(store: Arc<dyn StateStore>, state: TrackerState) {
    let session_count = state.sessions.len();
    let result = tokio::task::spawn_blocking(move || store.save(&state))
        .await
        .unwrap_or_else(|e| Err(SessionError::FlushTask(e.to_string())));

    if let Err(e) = result {
        tracing::error!(error = %e, session_count, "Failed to flush tracker state");
    }
}
