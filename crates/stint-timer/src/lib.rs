//! Stint Timer
//!
//! Wall-clock timing for the running session plus the `HH:MM:SS`
//! conversions shared by export and editing.

mod format;
mod timer;

pub use format::{format_time, parse_time};
pub use timer::{
    Clock, ManualClock, SystemClock, Timer, CONTINUOUS_SESSION_NAME, DEFAULT_SESSION_NAME,
    STOPPED_PLACEHOLDER_NAME,
};
