//! Tracker configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use stint_sessions::DEFAULT_STATE_KEY;

use crate::error::CoreError;
use crate::Result;

const DATA_DIR_ENV: &str = "STINT_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Record name holding the tracker state
    pub state_key: String,
    /// Append each stopped run to the session list
    pub record_on_stop: bool,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("stint.db"),
            state_key: DEFAULT_STATE_KEY.to_string(),
            record_on_stop: false,
        }
    }

    /// `$STINT_DATA_DIR`, else the platform local data dir
    pub fn data_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }

        dirs::data_local_dir()
            .map(|d| d.join("Stint"))
            .unwrap_or_else(|| PathBuf::from(".stint"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.state_key.trim().is_empty() {
            return Err(CoreError::Config("state_key cannot be empty".to_string()));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(CoreError::Config("database_path cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
