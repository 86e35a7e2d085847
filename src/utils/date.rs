//! Due date parsing and display.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];
const NAIVE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a due date into local wall-clock time.
///
/// Accepts RFC 3339 timestamps (converted to local time), naive timestamps,
/// `YYYY-MM-DD` and `MM/DD/YYYY`. Date-only values resolve to midnight.
pub fn parse_due_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Local).naive_local());
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(moment) = NaiveDateTime::parse_from_str(value, format) {
            return Some(moment);
        }
    }
    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Format a due date as e.g. "November 24, 2024", or "Invalid Date".
///
pub fn format_date(value: &str) -> String {
    match parse_due_date(value) {
        Some(moment) => moment.format("%B %-d, %Y").to_string(),
        None => String::from("Invalid Date"),
    }
}
