//! Lenient timestamp parsing for spreadsheet exports
//!
//! Anything that does not match a known layout is reported as `None` and the
//! event is dropped by the pivot, never treated as an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a timestamp cell, returning `None` when it cannot be interpreted
///
/// RFC 3339 values with an offset are normalized to UTC; everything else is
/// taken as wall-clock time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Seconds elapsed from `earlier` to `later`, keeping sub-second precision
pub fn seconds_between(earlier: NaiveDateTime, later: NaiveDateTime) -> f64 {
    let delta = later.signed_duration_since(earlier);
    match delta.num_nanoseconds() {
        Some(ns) => ns as f64 / 1_000_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Render a timestamp the way reports display it
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_iso_with_space() {
        let ts = parse_timestamp("2024-03-01 12:30:15").unwrap();
        assert_eq!(ts.hour(), 12);
        assert_eq!(ts.minute(), 30);
        assert_eq!(ts.second(), 15);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let a = parse_timestamp("2024-03-01 12:00:00").unwrap();
        let b = parse_timestamp("2024-03-01T12:00:00.250").unwrap();
        assert_eq!(seconds_between(a, b), 0.25);
    }

    #[test]
    fn test_parse_rfc3339_normalizes_to_utc() {
        let ts = parse_timestamp("2024-03-01T12:00:00+02:00").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_us_layout() {
        let ts = parse_timestamp("03/01/2024 08:05").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(ts.minute(), 5);
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        let ts = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn test_unparseable_values() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("not a time").is_none());
        assert!(parse_timestamp("2024-13-45 99:99:99").is_none());
    }

    #[test]
    fn test_seconds_between_is_signed() {
        let a = parse_timestamp("2024-03-01 00:00:10").unwrap();
        let b = parse_timestamp("2024-03-01 00:00:00").unwrap();
        assert_eq!(seconds_between(a, b), -10.0);
    }
}
