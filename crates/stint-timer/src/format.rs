//! `HH:MM:SS` duration text

/// Format milliseconds as `HH:MM:SS`.
///
/// Seconds are truncated, never rounded. Hours keep growing past 23.
pub fn format_time(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Parse `H:M:S` into milliseconds.
///
/// Anything other than three unsigned integer fields yields 0. Fields are
/// taken literally, so `1:90:00` means one hour and ninety minutes.
pub fn parse_time(text: &str) -> u64 {
    let fields: Vec<&str> = text.split(':').collect();
    let [hours, minutes, seconds] = fields.as_slice() else {
        return 0;
    };

    let parse = |field: &str| field.trim().parse::<u64>().ok();
    let (Some(h), Some(m), Some(s)) = (parse(*hours), parse(*minutes), parse(*seconds)) else {
        return 0;
    };

    h.checked_mul(3600)
        .and_then(|h| m.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(s))
        .and_then(|total| total.checked_mul(1000))
        .unwrap_or(0)
}
