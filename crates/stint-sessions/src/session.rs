//! Session data structures

use serde::{Deserialize, Serialize};

/// A finished, named stretch of time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    /// Duration in milliseconds
    pub elapsed: u64,
}

impl Session {
    pub fn new(name: impl Into<String>, elapsed: u64) -> Self {
        Self {
            name: name.into(),
            elapsed,
        }
    }
}

/// Direction for swapping a session with its neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards index 0
    Up,
    /// Towards the end of the list
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User preferences persisted alongside the session list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    #[serde(rename = "enableDarkMode")]
    pub dark_mode: bool,
    #[serde(rename = "continuousTiming")]
    pub continuous_timing: bool,
}

/// The single persisted record: every session plus preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerState {
    pub sessions: Vec<Session>,
    #[serde(flatten)]
    pub preferences: Preferences,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_wire_names() {
        assert_eq!(serde_json::to_string(&Direction::Up).unwrap(), "\"up\"");
        assert_eq!(
            serde_json::from_str::<Direction>("\"down\"").unwrap(),
            Direction::Down
        );
        assert!(serde_json::from_str::<Direction>("\"Up\"").is_err());
        assert_eq!(Direction::Down.to_string(), "down");
    }

    #[test]
    fn test_state_layout() {
        let state = TrackerState {
            sessions: vec![Session::new("A", 0), Session::new("B", 5000)],
            preferences: Preferences {
                dark_mode: true,
                continuous_timing: false,
            },
        };

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sessions": [
                    {"name": "A", "elapsed": 0},
                    {"name": "B", "elapsed": 5000}
                ],
                "enableDarkMode": true,
                "continuousTiming": false
            })
        );
    }

    #[test]
    fn test_partial_state_uses_defaults() {
        let state: TrackerState =
            serde_json::from_str(r#"{"sessions":[{"name":"A","elapsed":1}]}"#).unwrap();
        assert_eq!(state.sessions.len(), 1);
        assert_eq!(state.preferences, Preferences::default());

        let empty: TrackerState = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, TrackerState::default());
    }
}
