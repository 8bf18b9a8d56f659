//! Utility functions and helpers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a provider-supplied event timestamp.
///
/// Accepts RFC 3339 strings with `Z` or numeric offsets, offset-less
/// date-times (taken as UTC) and bare dates. Returns `None` for anything
/// unparseable; a malformed date is expected data, not an error.
pub fn parse_event_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    // The provider sometimes drops the offset or the seconds entirely.
    let naive_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in naive_formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}
