//! Aerial log timestamp parsing.
//!
//! Timestamps look like `07 Dec 2024 18:09:17 WIB`: two-digit day, English
//! month abbreviation, four-digit year, 24-hour time and a trailing zone
//! token. The zone token must be present but its value is not interpreted.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use thiserror::Error;

/// chrono format for the date/time part of a timestamp (zone token excluded).
pub const DATETIME_FORMAT: &str = "%d %b %Y %H:%M:%S";

static TIMESTAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2} [A-Za-z]{3} \d{4} \d{2}:\d{2}:\d{2}) ([A-Za-z][A-Za-z0-9:+\-]*)$").unwrap()
});

/// Errors produced while parsing a timestamp string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp '{0}' does not match 'DD Mon YYYY HH:MM:SS ZZZ'")]
    Shape(String),

    #[error("timestamp '{value}' is not a valid calendar instant: {reason}")]
    Calendar { value: String, reason: String },
}

/// Parse an aerial log timestamp into a naive calendar instant.
///
/// The zone token is only checked for presence; two timestamps with
/// different tokens compare purely on their date and time.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TimestampError> {
    let caps = TIMESTAMP_PATTERN
        .captures(value)
        .ok_or_else(|| TimestampError::Shape(value.to_string()))?;

    NaiveDateTime::parse_from_str(&caps[1], DATETIME_FORMAT).map_err(|e| {
        TimestampError::Calendar {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Format a calendar instant back into the aerial log shape with `zone` appended.
pub fn format_timestamp(time: &NaiveDateTime, zone: &str) -> String {
    format!("{} {}", time.format(DATETIME_FORMAT), zone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_sample_timestamp() {
        let t = parse_timestamp("07 Dec 2024 18:09:17 WIB").unwrap();
        assert_eq!(t.year(), 2024);
        assert_eq!(t.month(), 12);
        assert_eq!(t.day(), 7);
        assert_eq!((t.hour(), t.minute(), t.second()), (18, 9, 17));
    }

    #[test]
    fn test_ordering_follows_time() {
        let earlier = parse_timestamp("07 Dec 2024 18:09:18 WIB").unwrap();
        let later = parse_timestamp("07 Dec 2024 18:10:20 WIB").unwrap();
        assert!(later > earlier);
    }

    #[test]
    fn test_zone_token_not_interpreted() {
        let a = parse_timestamp("01 Jan 2025 00:00:00 UTC").unwrap();
        let b = parse_timestamp("01 Jan 2025 00:00:00 WITA").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_zone_token_rejected() {
        let err = parse_timestamp("07 Dec 2024 18:09:17").unwrap_err();
        assert!(matches!(err, TimestampError::Shape(_)));
    }

    #[test]
    fn test_wrong_shape_rejected() {
        for bad in [
            "",
            "2024-12-07 18:09:17 WIB",
            "7 Dec 2024 18:09:17 WIB",
            "07 December 2024 18:09:17 WIB",
            "07 Dec 24 18:09:17 WIB",
            "07 Dec 2024 18:09 WIB",
            " 07 Dec 2024 18:09:17 WIB",
        ] {
            assert!(parse_timestamp(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_impossible_date_rejected() {
        let err = parse_timestamp("31 Feb 2024 10:00:00 WIB").unwrap_err();
        assert!(matches!(err, TimestampError::Calendar { .. }));

        let err = parse_timestamp("07 Xyz 2024 10:00:00 WIB").unwrap_err();
        assert!(matches!(err, TimestampError::Calendar { .. }));
    }

    #[test]
    fn test_format_round_trip() {
        let t = parse_timestamp("07 Dec 2024 18:09:17 WIB").unwrap();
        assert_eq!(format_timestamp(&t, "WIB"), "07 Dec 2024 18:09:17 WIB");
    }
}
