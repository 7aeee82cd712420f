//! Elapsed time text and power log keys.
//!
//! A trackpoint's offset from the start is rendered as `H:MM:SS`, then the
//! hour field is folded into minutes to give the log's `MM:SS` key
//! (`1:02:03` → `62:03`).

use chrono::NaiveDateTime;

/// Elapsed time of one trackpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElapsedTime {
    /// `H:MM:SS`, or `00:00` for the start trackpoint
    pub text: String,
    /// Power log key, `None` when the text cannot be folded (negative offsets)
    pub key: Option<String>,
}

/// Key used for the trackpoint at the start time.
pub const START_KEY: &str = "00:00";

/// Elapsed time of `at` relative to `start`, truncated to whole seconds.
pub fn elapsed_time(start: NaiveDateTime, at: NaiveDateTime) -> ElapsedTime {
    if at == start {
        return ElapsedTime {
            text: START_KEY.to_string(),
            key: Some(START_KEY.to_string()),
        };
    }

    // num_seconds truncates toward zero
    let text = format_hms((at - start).num_seconds());
    let key = log_key(&text);

    ElapsedTime { text, key }
}

/// Render whole seconds as `H:MM:SS`; negative values get a leading `-`.
pub fn format_hms(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();

    format!(
        "{}{}:{:02}:{:02}",
        sign,
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Fold `H:MM:SS` into the `MM:SS` power log key.
pub fn log_key(hms: &str) -> Option<String> {
    let mut fields = hms.split(':');
    let hours: u64 = fields.next()?.parse().ok()?;
    let minutes: u64 = fields.next()?.parse().ok()?;
    let seconds: u64 = fields.next()?.parse().ok()?;

    if fields.next().is_some() {
        return None;
    }

    Some(format!("{:02}:{:02}", hours * 60 + minutes, seconds))
}
