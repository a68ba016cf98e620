//! Date parsing shared by type inference and the date checks.

use audit_core::DEFAULT_DATE_FORMATS;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parses a value under the given chrono formats.
///
/// Each format is tried as a full timestamp first, then as a plain date
/// (taken at midnight). Returns `None` if no format matches.
pub fn parse_datetime<S: AsRef<str>>(raw: &str, formats: &[S]) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in formats {
        let format = format.as_ref();
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime);
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Returns true if the value reads as a date under the default formats or RFC 3339.
pub fn looks_like_date(raw: &str) -> bool {
    DateTime::parse_from_rfc3339(raw.trim()).is_ok()
        || parse_datetime(raw, DEFAULT_DATE_FORMATS).is_some()
}
