//! Request Dispatcher
//!
//! Maps each request to a store or timer operation. Failures become error
//! responses here and never escape to the transport.

use parking_lot::Mutex;
use serde_json::Number;

use stint_sessions::{SessionError, SessionStore};
use stint_timer::Timer;

use crate::error::CoreError;
use crate::export::export_markdown;
use crate::protocol::{Request, Response, Status};
use crate::Result;

/// Name given to sessions added with a blank name
pub const NEW_SESSION_NAME: &str = "New Session";

pub struct Dispatcher {
    store: SessionStore,
    timer: Mutex<Timer>,
    record_on_stop: bool,
}

impl Dispatcher {
    pub fn new(store: SessionStore, timer: Timer) -> Self {
        Self {
            store,
            timer: Mutex::new(timer),
            record_on_stop: false,
        }
    }

    /// Append every stopped run to the session list
    pub fn with_record_on_stop(mut self, enabled: bool) -> Self {
        self.record_on_stop = enabled;
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Handle one raw JSON request
    pub fn handle_json(&self, raw: &str) -> Response {
        match Request::from_json(raw) {
            Ok(request) => self.handle(request),
            Err(e) => {
                tracing::warn!(error = %e, "Rejected malformed request");
                Response::error(e.to_string())
            }
        }
    }

    /// Handle one typed request; always produces a response
    pub fn handle(&self, request: Request) -> Response {
        let action = request.action().to_string();
        tracing::debug!(action = %action, mutation = request.is_mutation(), "Handling request");

        match self.dispatch(request) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(action = %action, error = %e, "Request failed");
                Response::error(e.to_string())
            }
        }
    }

    fn dispatch(&self, request: Request) -> Result<Response> {
        match request {
            Request::StartTimer { session_name } => {
                let continuous = self.store.preferences().continuous_timing;
                self.timer.lock().start(&session_name, continuous);
                Ok(Response::ack(Status::Started))
            }
            Request::StopTimer { session_name } => self.stop_timer(session_name.as_deref()),
            Request::ResetTimer => {
                self.timer.lock().reset();
                Ok(Response::ack(Status::Reset))
            }
            Request::ExportMarkdown => Ok(Response::Markdown {
                markdown: export_markdown(&self.store.list()),
            }),
            Request::GetElapsedTime => Ok(Response::Elapsed {
                elapsed: self.timer.lock().elapsed(),
            }),
            Request::GetSessions => Ok(Response::Sessions {
                sessions: self.store.list(),
            }),
            Request::AddSession {
                session_name,
                elapsed,
            } => {
                let name = non_blank(session_name).unwrap_or_else(|| NEW_SESSION_NAME.to_string());
                let session = self.store.add(name, elapsed);
                Ok(Response::session(Status::Added, session))
            }
            Request::EditSession {
                index,
                new_name,
                new_elapsed,
            } => {
                let index = self.resolve_index(&index)?;
                // A blank name keeps the current one
                let name = match non_blank(new_name) {
                    Some(name) => name,
                    None => self
                        .store
                        .get(index)
                        .map(|s| s.name)
                        .unwrap_or_default(),
                };
                let session = self.store.edit(index, name, new_elapsed)?;
                Ok(Response::session(Status::Edited, session))
            }
            Request::DeleteSession { index } => {
                let index = self.resolve_index(&index)?;
                self.store.delete(index)?;
                Ok(Response::ack(Status::Deleted))
            }
            Request::MoveSession { index, direction } => {
                let index = self.resolve_index(&index)?;
                self.store.move_session(index, direction)?;
                Ok(Response::Moved {
                    status: Status::Moved,
                    direction,
                })
            }
            Request::GetSettings => Ok(Response::Settings {
                settings: self.store.preferences(),
            }),
            Request::SaveSettings {
                enable_dark_mode,
                continuous_timing,
            } => {
                let settings = self
                    .store
                    .update_preferences(enable_dark_mode, continuous_timing);
                if !settings.continuous_timing {
                    self.timer.lock().clear_continuous_name();
                }
                Ok(Response::SavedSettings {
                    status: Status::Saved,
                    settings,
                })
            }
            Request::Unknown { action } => Err(CoreError::UnknownAction(action)),
        }
    }

    fn stop_timer(&self, next_name: Option<&str>) -> Result<Response> {
        let continuous = self.store.preferences().continuous_timing;
        let mut timer = self.timer.lock();

        let was_running = timer.is_running();
        let session = timer.stop();

        if was_running && self.record_on_stop {
            self.store.add(session.name.clone(), session.elapsed);
        }

        let restarted = continuous && timer.start(next_name.unwrap_or_default(), true);

        Ok(Response::Session {
            status: Status::Stopped,
            session,
            restarted: restarted.then_some(true),
        })
    }

    /// Whole non-negative numbers are positions; anything else is out of bounds
    fn resolve_index(&self, index: &Number) -> Result<usize> {
        let position = index
            .as_u64()
            .or_else(|| {
                index
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|i| usize::try_from(i).ok());

        position.ok_or_else(|| {
            tracing::debug!(index = %index, "Index is not a list position");
            CoreError::Session(SessionError::InvalidIndex {
                index: index.as_i64().unwrap_or(i64::MAX),
                len: self.store.len(),
            })
        })
    }
}

fn non_blank(name: String) -> Option<String> {
    if name.trim().is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use stint_sessions::{Direction, Session};
    use stint_timer::ManualClock;

    fn dispatcher() -> (Dispatcher, ManualClock) {
        let clock = ManualClock::new();
        let timer = Timer::with_clock(Arc::new(clock.clone()));
        (Dispatcher::new(SessionStore::in_memory(), timer), clock)
    }

    fn with_sessions(sessions: &[(&str, u64)]) -> Dispatcher {
        let (dispatcher, _clock) = dispatcher();
        for (name, elapsed) in sessions {
            dispatcher.store().add(name.to_string(), *elapsed);
        }
        dispatcher
    }

    fn send(dispatcher: &Dispatcher, request: serde_json::Value) -> serde_json::Value {
        let response = dispatcher.handle_json(&request.to_string());
        serde_json::to_value(response).unwrap()
    }

    #[test]
    fn test_move_then_export_scenario() {
        let dispatcher = with_sessions(&[("A", 0), ("B", 5000)]);

        let response = send(
            &dispatcher,
            json!({"action": "moveSession", "index": 0, "direction": "down"}),
        );
        assert_eq!(response, json!({"status": "moved", "direction": "down"}));
        assert_eq!(
            dispatcher.store().list(),
            vec![Session::new("B", 5000), Session::new("A", 0)]
        );

        let response = send(&dispatcher, json!({"action": "exportMarkdown"}));
        let markdown = response["markdown"].as_str().unwrap().to_string();
        let entries: Vec<&str> = markdown
            .lines()
            .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()))
            .collect();
        assert_eq!(entries, vec!["1. B — 00:00:05", "2. A — 00:00:00"]);
    }

    #[test]
    fn test_edit_invalid_index_scenario() {
        let dispatcher = with_sessions(&[("A", 0), ("B", 5000)]);
        let before = dispatcher.store().list();

        let response = send(
            &dispatcher,
            json!({"action": "editSession", "index": 5, "newName": "X", "newElapsed": 1}),
        );
        assert_eq!(
            response,
            json!({"status": "error", "message": "Invalid session index"})
        );
        assert_eq!(dispatcher.store().list(), before);
    }

    #[test]
    fn test_negative_index_is_invalid() {
        let dispatcher = with_sessions(&[("A", 0)]);
        for action in ["deleteSession", "editSession"] {
            let response = send(&dispatcher, json!({"action": action, "index": -1}));
            assert_eq!(response["message"], "Invalid session index");
        }
        let response = send(
            &dispatcher,
            json!({"action": "moveSession", "index": -1, "direction": "up"}),
        );
        assert_eq!(response["message"], "Invalid session index");
        assert_eq!(dispatcher.store().len(), 1);
    }

    #[test]
    fn test_unrepresentable_index_is_invalid() {
        let dispatcher = with_sessions(&[("A", 0), ("B", 1)]);
        let before = dispatcher.store().list();

        for index in [json!(18446744073709551615u64), json!(-1), json!(1.5), json!(1e30)] {
            let response = send(&dispatcher, json!({"action": "deleteSession", "index": index}));
            assert_eq!(
                response,
                json!({"status": "error", "message": "Invalid session index"})
            );
        }
        assert_eq!(dispatcher.store().list(), before);

        // A whole float still names a position
        let response = send(
            &dispatcher,
            json!({"action": "editSession", "index": 1.0, "newName": "Renamed"}),
        );
        assert_eq!(response["session"]["name"], "Renamed");
    }

    #[test]
    fn test_move_blocked_at_boundary() {
        let dispatcher = with_sessions(&[("A", 0), ("B", 1)]);

        let response = send(
            &dispatcher,
            json!({"action": "moveSession", "index": 0, "direction": "up"}),
        );
        assert_eq!(response, json!({"status": "error", "message": "Cannot move session"}));

        let response = send(
            &dispatcher,
            json!({"action": "moveSession", "index": 1, "direction": "down"}),
        );
        assert_eq!(response["message"], "Cannot move session");
    }

    #[test]
    fn test_add_edit_delete_flow() {
        let (dispatcher, _clock) = dispatcher();

        let response = send(
            &dispatcher,
            json!({"action": "addSession", "sessionName": "Review", "elapsed": 0}),
        );
        assert_eq!(
            response,
            json!({"status": "added", "session": {"name": "Review", "elapsed": 0}})
        );

        let response = send(&dispatcher, json!({"action": "addSession", "sessionName": ""}));
        assert_eq!(response["session"]["name"], NEW_SESSION_NAME);

        // Blank name keeps the old one; explicit zero overwrites
        dispatcher.store().edit(0, "Review".to_string(), Some(9000)).unwrap();
        let response = send(
            &dispatcher,
            json!({"action": "editSession", "index": 0, "newName": "", "newElapsed": 0}),
        );
        assert_eq!(
            response,
            json!({"status": "edited", "session": {"name": "Review", "elapsed": 0}})
        );

        // Absent elapsed leaves it alone
        dispatcher.store().edit(1, "Other".to_string(), Some(700)).unwrap();
        let response = send(
            &dispatcher,
            json!({"action": "editSession", "index": 1, "newName": "Renamed"}),
        );
        assert_eq!(response["session"], json!({"name": "Renamed", "elapsed": 700}));

        let response = send(&dispatcher, json!({"action": "deleteSession", "index": 0}));
        assert_eq!(response, json!({"status": "deleted"}));

        let response = send(&dispatcher, json!({"action": "getSessions"}));
        assert_eq!(
            response,
            json!({"sessions": [{"name": "Renamed", "elapsed": 700}]})
        );
    }

    #[test]
    fn test_timer_actions() {
        let (dispatcher, clock) = dispatcher();

        let response = send(&dispatcher, json!({"action": "startTimer", "sessionName": "Focus"}));
        assert_eq!(response, json!({"status": "started"}));

        clock.advance(Duration::from_millis(2500));
        let response = send(&dispatcher, json!({"action": "getElapsedTime"}));
        assert_eq!(response, json!({"elapsed": 2500}));

        let response = send(&dispatcher, json!({"action": "stopTimer"}));
        assert_eq!(
            response,
            json!({"status": "stopped", "session": {"name": "Focus", "elapsed": 2500}})
        );
        // Stopping does not record unless configured to
        assert!(dispatcher.store().is_empty());

        let response = send(&dispatcher, json!({"action": "resetTimer"}));
        assert_eq!(response, json!({"status": "reset"}));
        let response = send(&dispatcher, json!({"action": "getElapsedTime"}));
        assert_eq!(response, json!({"elapsed": 0}));
    }

    #[test]
    fn test_record_on_stop() {
        let clock = ManualClock::new();
        let timer = Timer::with_clock(Arc::new(clock.clone()));
        let dispatcher =
            Dispatcher::new(SessionStore::in_memory(), timer).with_record_on_stop(true);

        send(&dispatcher, json!({"action": "startTimer", "sessionName": "Call"}));
        clock.advance(Duration::from_secs(3));
        send(&dispatcher, json!({"action": "stopTimer"}));
        // Idle stop records nothing new
        send(&dispatcher, json!({"action": "stopTimer"}));

        assert_eq!(dispatcher.store().list(), vec![Session::new("Call", 3000)]);
    }

    #[test]
    fn test_continuous_timing_restarts_on_stop() {
        let (dispatcher, clock) = dispatcher();
        let response = send(
            &dispatcher,
            json!({"action": "saveSettings", "continuousTiming": true}),
        );
        assert_eq!(
            response,
            json!({
                "status": "saved",
                "settings": {"enableDarkMode": false, "continuousTiming": true}
            })
        );

        send(&dispatcher, json!({"action": "startTimer", "sessionName": "Sprint"}));
        clock.advance(Duration::from_secs(1));

        let response = send(&dispatcher, json!({"action": "stopTimer"}));
        assert_eq!(response["session"], json!({"name": "Sprint", "elapsed": 1000}));
        assert_eq!(response["restarted"], true);

        // The restarted run keeps the remembered name
        clock.advance(Duration::from_secs(2));
        let response = send(
            &dispatcher,
            json!({"action": "stopTimer", "sessionName": "Next"}),
        );
        assert_eq!(response["session"], json!({"name": "Sprint", "elapsed": 2000}));

        clock.advance(Duration::from_secs(4));
        let response = send(&dispatcher, json!({"action": "stopTimer"}));
        assert_eq!(response["session"], json!({"name": "Next", "elapsed": 4000}));

        // Turning it off forgets the name and stops restarting
        send(&dispatcher, json!({"action": "saveSettings", "continuousTiming": false}));
        let response = send(&dispatcher, json!({"action": "stopTimer"}));
        assert!(response.get("restarted").is_none());
    }

    #[test]
    fn test_settings_round_trip() {
        let (dispatcher, _clock) = dispatcher();
        send(&dispatcher, json!({"action": "saveSettings", "enableDarkMode": true}));

        let response = send(&dispatcher, json!({"action": "getSettings"}));
        assert_eq!(
            response,
            json!({"settings": {"enableDarkMode": true, "continuousTiming": false}})
        );
    }

    #[test]
    fn test_unknown_and_malformed_requests() {
        let (dispatcher, _clock) = dispatcher();

        let response = send(&dispatcher, json!({"action": "launchRocket"}));
        assert_eq!(
            response,
            json!({"status": "error", "message": "Unknown action: launchRocket"})
        );

        let response = dispatcher.handle_json("{{{");
        assert!(response.is_error());

        let response = send(
            &dispatcher,
            json!({"action": "moveSession", "index": 0, "direction": "sideways"}),
        );
        assert_eq!(response["status"], "error");
        assert!(response["message"]
            .as_str()
            .unwrap()
            .starts_with("Malformed request"));
    }

    #[test]
    fn test_move_up_and_down_are_inverses() {
        let dispatcher = with_sessions(&[("A", 0), ("B", 1), ("C", 2)]);
        let before = dispatcher.store().list();

        dispatcher.handle(Request::MoveSession {
            index: 1.into(),
            direction: Direction::Down,
        });
        dispatcher.handle(Request::MoveSession {
            index: 2.into(),
            direction: Direction::Up,
        });
        assert_eq!(dispatcher.store().list(), before);
    }
}
