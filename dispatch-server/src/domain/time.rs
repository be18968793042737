//! Timestamp handling for schedules and timelines.
//!
//! Callers supply scheduled times as ISO-8601 local timestamps
//! ("2026-08-21T10:00:00"). Internally every instant is a
//! `chrono::NaiveDateTime`; these helpers cover the parsing and the
//! fractional-minute arithmetic the simulator needs.

use chrono::{Duration, NaiveDateTime};

/// Error returned when parsing an invalid timestamp string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

/// Accepted fallback layouts when the strict ISO form does not match.
///
/// Seconds are optional and a space may stand in for the `T` separator,
/// matching what schedule feeds actually send.
const FALLBACK_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse an ISO-8601 local timestamp.
///
/// # Examples
///
/// ```
/// use dispatch_server::domain::parse_timestamp;
///
/// assert!(parse_timestamp("2026-08-21T10:00:00").is_ok());
/// assert!(parse_timestamp("2026-08-21 10:00").is_ok());
///
/// assert!(parse_timestamp("10:00").is_err());
/// assert!(parse_timestamp("not a time").is_err());
/// ```
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, TimeError> {
    if let Ok(t) = s.parse::<NaiveDateTime>() {
        return Ok(t);
    }
    for format in FALLBACK_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(t);
        }
    }
    Err(TimeError {
        reason: "expected an ISO-8601 local timestamp like 2026-08-21T10:00:00",
    })
}

/// Add a possibly-fractional number of minutes to an instant.
///
/// Fractions are kept to millisecond resolution. Saturates at the
/// representable extremes instead of panicking on absurd offsets.
pub fn add_minutes(t: NaiveDateTime, minutes: f64) -> NaiveDateTime {
    let millis = (minutes * 60_000.0).round() as i64;
    match t.checked_add_signed(Duration::milliseconds(millis)) {
        Some(shifted) => shifted,
        None if millis < 0 => NaiveDateTime::MIN,
        None => NaiveDateTime::MAX,
    }
}

/// Signed minutes from `earlier` to `later`.
///
/// Negative when `later` is actually before `earlier`.
pub fn minutes_between(later: NaiveDateTime, earlier: NaiveDateTime) -> f64 {
    later.signed_duration_since(earlier).num_milliseconds() as f64 / 60_000.0
}

/// Format an instant as "HH:MM" for display surfaces.
pub fn format_hhmm(t: NaiveDateTime) -> String {
    t.format("%H:%M").to_string()
}
