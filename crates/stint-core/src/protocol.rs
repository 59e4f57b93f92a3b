//! Wire protocol between the UI and the tracker
//!
//! Requests are JSON objects tagged by `action`; every request gets exactly
//! one JSON response.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use stint_sessions::{Direction, Preferences, Session};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    StartTimer {
        #[serde(default)]
        session_name: String,
    },
    /// `session_name` names the next run when continuous timing restarts
    StopTimer {
        #[serde(default)]
        session_name: Option<String>,
    },
    ResetTimer,
    ExportMarkdown,
    GetElapsedTime,
    GetSessions,
    AddSession {
        #[serde(default)]
        session_name: String,
        #[serde(default)]
        elapsed: u64,
    },
    /// Indices stay raw JSON numbers; the dispatcher decides whether they name a position
    EditSession {
        index: Number,
        #[serde(default)]
        new_name: String,
        #[serde(default)]
        new_elapsed: Option<u64>,
    },
    DeleteSession {
        index: Number,
    },
    MoveSession {
        index: Number,
        direction: Direction,
    },
    GetSettings,
    SaveSettings {
        #[serde(default)]
        enable_dark_mode: Option<bool>,
        #[serde(default)]
        continuous_timing: Option<bool>,
    },
    /// Any tag not listed above
    #[serde(skip)]
    Unknown { action: String },
}

const KNOWN_ACTIONS: &[&str] = &[
    "startTimer",
    "stopTimer",
    "resetTimer",
    "exportMarkdown",
    "getElapsedTime",
    "getSessions",
    "addSession",
    "editSession",
    "deleteSession",
    "moveSession",
    "getSettings",
    "saveSettings",
];

impl Request {
    /// Parse one request from JSON text
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| CoreError::MalformedRequest(e.to_string()))?;
        Self::from_value(value)
    }

    /// Unrecognized tags become `Unknown`; known tags with bad fields are malformed
    pub fn from_value(value: Value) -> Result<Self> {
        let action = value
            .get("action")
            .and_then(Value::as_str)
            .ok_or_else(|| CoreError::MalformedRequest("missing action".to_string()))?;

        if !KNOWN_ACTIONS.contains(&action) {
            return Ok(Request::Unknown {
                action: action.to_string(),
            });
        }

        serde_json::from_value(value).map_err(|e| CoreError::MalformedRequest(e.to_string()))
    }

    pub fn action(&self) -> &str {
        match self {
            Request::StartTimer { .. } => "startTimer",
            Request::StopTimer { .. } => "stopTimer",
            Request::ResetTimer => "resetTimer",
            Request::ExportMarkdown => "exportMarkdown",
            Request::GetElapsedTime => "getElapsedTime",
            Request::GetSessions => "getSessions",
            Request::AddSession { .. } => "addSession",
            Request::EditSession { .. } => "editSession",
            Request::DeleteSession { .. } => "deleteSession",
            Request::MoveSession { .. } => "moveSession",
            Request::GetSettings => "getSettings",
            Request::SaveSettings { .. } => "saveSettings",
            Request::Unknown { action } => action,
        }
    }

    /// Whether handling this request may change persisted state
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Request::AddSession { .. }
                | Request::EditSession { .. }
                | Request::DeleteSession { .. }
                | Request::MoveSession { .. }
                | Request::SaveSettings { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Started,
    Stopped,
    Reset,
    Added,
    Edited,
    Deleted,
    Moved,
    Saved,
    Error,
}

/// Response shapes, serialized without a variant tag.
///
/// Variant order matters for deserialization: richer shapes come first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Session {
        status: Status,
        session: Session,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        restarted: Option<bool>,
    },
    Moved {
        status: Status,
        direction: Direction,
    },
    SavedSettings {
        status: Status,
        settings: Preferences,
    },
    Error {
        status: Status,
        message: String,
    },
    Ack {
        status: Status,
    },
    Markdown {
        markdown: String,
    },
    Elapsed {
        elapsed: u64,
    },
    Sessions {
        sessions: Vec<Session>,
    },
    Settings {
        settings: Preferences,
    },
}

impl Response {
    pub fn ack(status: Status) -> Self {
        Response::Ack { status }
    }

    pub fn session(status: Status, session: Session) -> Self {
        Response::Session {
            status,
            session,
            restarted: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            status: Status::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to serialize response");
            r#"{"status":"error","message":"Internal error"}"#.to_string()
        })
    }
}
