//! Date and datetime helpers for filter values and stored columns
//!
//! SQLite stores both as TEXT: dates as `YYYY-MM-DD`, datetimes as
//! `YYYY-MM-DD HH:MM:SS` (UTC, optional fractional seconds).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Legacy "no value" marker stored in non-nullable datetime columns
pub const ZERO_DATETIME: &str = "0000-00-00 00:00:00";

const DATETIME_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a calendar day. Datetime input is accepted and truncated to its day.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date()))
}

/// Parse a datetime.
///
/// Accepts RFC 3339 (converted to UTC), naive `YYYY-MM-DD[ T]HH:MM[:SS[.f]]`,
/// and a bare date meaning midnight.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Storage form; fractional seconds are kept only when present
pub fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.nanosecond() == 0 {
        dt.format(DATETIME_FORMAT).to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }
}
