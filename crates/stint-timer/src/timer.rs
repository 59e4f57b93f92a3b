//! Session timer
//!
//! One run at a time. Stopping a run yields a `Session` descriptor; the
//! timer itself never touches the session list.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use stint_sessions::Session;

pub const DEFAULT_SESSION_NAME: &str = "Default Session";
pub const CONTINUOUS_SESSION_NAME: &str = "Continuous Session";
/// Name reported by a stop when no run ever happened
pub const STOPPED_PLACEHOLDER_NAME: &str = "N/A";

/// Source of monotonic time
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock()
    }
}

#[derive(Debug, Clone)]
struct Run {
    name: String,
    started_at: Instant,
}

pub struct Timer {
    clock: Arc<dyn Clock>,
    run: Option<Run>,
    /// Descriptor of the most recently stopped run
    last: Session,
    /// Name carried between runs while continuous timing is on
    continuous_name: Option<String>,
}

impl Timer {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            run: None,
            last: Session::new(STOPPED_PLACEHOLDER_NAME, 0),
            continuous_name: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Name of the running session, if any
    pub fn current_name(&self) -> Option<&str> {
        self.run.as_ref().map(|run| run.name.as_str())
    }

    pub fn continuous_name(&self) -> Option<&str> {
        self.continuous_name.as_deref()
    }

    pub fn clear_continuous_name(&mut self) {
        self.continuous_name = None;
    }

    /// Start a run. Returns `false` without side effects if one is already running.
    ///
    /// Blank names fall back to a default. In continuous mode the name is
    /// remembered and reused by later blank starts.
    pub fn start(&mut self, requested: &str, continuous: bool) -> bool {
        if let Some(run) = &self.run {
            tracing::debug!(name = %run.name, "Timer already running");
            return false;
        }

        let requested = requested.trim();
        let name = if continuous {
            let name = if requested.is_empty() {
                self.continuous_name
                    .clone()
                    .unwrap_or_else(|| CONTINUOUS_SESSION_NAME.to_string())
            } else {
                requested.to_string()
            };
            self.continuous_name = Some(name.clone());
            name
        } else if requested.is_empty() {
            DEFAULT_SESSION_NAME.to_string()
        } else {
            requested.to_string()
        };

        tracing::info!(name = %name, continuous, "Timer started");

        self.run = Some(Run {
            name,
            started_at: self.clock.now(),
        });
        true
    }

    /// Stop the running session and describe it.
    ///
    /// When idle this repeats the last descriptor.
    pub fn stop(&mut self) -> Session {
        if let Some(run) = self.run.take() {
            let elapsed = self.millis_since(run.started_at);
            self.last = Session::new(run.name, elapsed);
            tracing::info!(name = %self.last.name, elapsed, "Timer stopped");
        }
        self.last.clone()
    }

    /// Stop without recording and forget the continuous name
    pub fn reset(&mut self) {
        self.run = None;
        self.last = Session::new(STOPPED_PLACEHOLDER_NAME, 0);
        self.continuous_name = None;
        tracing::info!("Timer reset");
    }

    /// Milliseconds in the current run, or of the last run when idle
    pub fn elapsed(&self) -> u64 {
        match &self.run {
            Some(run) => self.millis_since(run.started_at),
            None => self.last.elapsed,
        }
    }

    fn millis_since(&self, started_at: Instant) -> u64 {
        let millis = self.clock.now().saturating_duration_since(started_at).as_millis();
        u64::try_from(millis).unwrap_or(u64::MAX)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
