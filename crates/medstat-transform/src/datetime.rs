//! Permissive date/time parsing for workbook-sourced text.
//!
//! The transport sheet is filled by a web form, so its date column arrives
//! in more than one layout; the received-time field sometimes carries label
//! tokens before the actual time. The upstream format is unverified, so the
//! last-token rule is preserved as observed rather than tightened.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Parse a datetime, falling back to date-only layouts at midnight.
/// Returns `None` for anything unrecognized; callers treat that as null.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(parsed.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Parse a bare time of day.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in TIME_FORMATS {
        if let Ok(parsed) = NaiveTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    None
}

/// Parse the final whitespace-delimited token of a received-time field as a
/// time of day. Leading tokens (labels, dates) are ignored.
pub fn parse_time_last_token(raw: &str) -> Option<NaiveTime> {
    let token = raw.split_whitespace().next_back()?;
    parse_time(token)
}

/// Elapsed seconds from `origin` to `received` within one day; negative when
/// the received time of day precedes the origin.
pub fn interval_seconds(origin: NaiveTime, received: NaiveTime) -> i64 {
    (received - origin).num_seconds()
}
