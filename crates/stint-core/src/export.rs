//! Markdown export of the session list

use std::fmt::Write;

use stint_sessions::Session;
use stint_timer::format_time;

pub const EXPORT_HEADER: &str = "# Exported Markdown";

/// Render sessions as `<n>. <name> — <HH:MM:SS>` lines under a header
pub fn export_markdown(sessions: &[Session]) -> String {
    let mut out = format!("{EXPORT_HEADER}\n\n");
    for (i, session) in sessions.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} — {}",
            i + 1,
            session.name,
            format_time(session.elapsed)
        );
    }
    out
}
