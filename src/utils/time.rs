//! Time utilities: rendering capture instants, parsing CLI durations.

use chrono::{DateTime, Local, Utc};
use std::time::Duration;

/// Human/export rendering of a capture instant.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `YYYY-MM-DD HH:mm:ss` in the device's local time zone.
pub fn display_local(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format(DISPLAY_FORMAT).to_string()
}

/// Parse a non-negative number of seconds (`2`, `0.5`).
/// Values beyond what a `Duration` holds saturate; callers cap them anyway.
pub fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid duration: {}", s))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("Invalid duration: {}", s));
    }
    Ok(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}
