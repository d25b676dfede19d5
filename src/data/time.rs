//! Display timestamps in the fixed UTC+5:30 offset.
//!
//! This is a constant shift, not a timezone-database lookup: no daylight
//! saving, no historical offset changes.

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use thiserror::Error;

use crate::api::Timestamp;

/// Offset added to UTC before formatting (5 h 30 min).
pub const DISPLAY_OFFSET_MINUTES: i64 = 5 * 60 + 30;

/// Naive layouts the backend emits (`datetime.isoformat()`), read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A raw value that cannot be shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("timestamp out of range: {0}")]
    OutOfRange(i64),
}

/// Parse a raw backend timestamp into a UTC instant.
pub fn parse_instant(ts: &Timestamp) -> Result<DateTime<Utc>, FormatError> {
    match ts {
        Timestamp::Millis(ms) => Utc
            .timestamp_millis_opt(*ms)
            .single()
            .ok_or(FormatError::OutOfRange(*ms)),
        Timestamp::Text(text) => parse_text(text.trim()),
    }
}

fn parse_text(text: &str) -> Result<DateTime<Utc>, FormatError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| FormatError::InvalidTimestamp(text.to_string()))
}

/// Format an instant as `DD/MM/YYYY, hh:mm:ss AM|PM` at UTC+5:30.
///
/// Returns `None` only if shifting would leave chrono's representable range.
pub fn format_instant(instant: DateTime<Utc>) -> Option<String> {
    let local = instant
        .naive_utc()
        .checked_add_signed(TimeDelta::minutes(DISPLAY_OFFSET_MINUTES))?;
    // %I maps hour 0 to 12 and zero-pads; %p is "AM"/"PM".
    Some(local.format("%d/%m/%Y, %I:%M:%S %p").to_string())
}

/// Format a raw backend timestamp for display.
pub fn format_display_time(ts: &Timestamp) -> Result<String, FormatError> {
    let instant = parse_instant(ts)?;
    format_instant(instant).ok_or_else(|| FormatError::OutOfRange(instant.timestamp_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(s: &str) -> String {
        format_display_time(&Timestamp::from(s)).unwrap()
    }

    #[test]
    fn test_rolls_over_midnight() {
        assert_eq!(fmt("2024-01-15T18:30:00Z"), "16/01/2024, 12:00:00 AM");
    }

    #[test]
    fn test_utc_midnight() {
        assert_eq!(fmt("2024-01-15T00:00:00Z"), "15/01/2024, 05:30:00 AM");
    }

    #[test]
    fn test_noon_and_afternoon() {
        assert_eq!(fmt("2024-03-01T06:30:00Z"), "01/03/2024, 12:00:00 PM");
        assert_eq!(fmt("2024-03-01T08:05:09Z"), "01/03/2024, 01:35:09 PM");
        assert_eq!(fmt("2024-03-01T17:59:59Z"), "01/03/2024, 11:29:59 PM");
    }

    #[test]
    fn test_year_rollover() {
        assert_eq!(fmt("2023-12-31T20:00:00Z"), "01/01/2024, 01:30:00 AM");
    }

    #[test]
    fn test_offset_input_is_normalised() {
        assert_eq!(fmt("2024-01-15T05:30:00+05:30"), "15/01/2024, 05:30:00 AM");
    }

    #[test]
    fn test_naive_iso_is_utc() {
        assert_eq!(fmt("2024-01-15T18:30:00.654321"), "16/01/2024, 12:00:00 AM");
        assert_eq!(fmt("2024-01-15 00:00:00"), "15/01/2024, 05:30:00 AM");
    }

    #[test]
    fn test_epoch_millis() {
        // 2024-01-15T18:30:00Z
        let ts = Timestamp::Millis(1_705_343_400_000);
        assert_eq!(format_display_time(&ts).unwrap(), "16/01/2024, 12:00:00 AM");
    }

    #[test]
    fn test_output_shape() {
        for s in ["2024-02-29T23:59:59Z", "1999-07-04T12:00:00Z", "2030-10-10T03:03:03Z"] {
            let out = fmt(s);
            let bytes = out.as_bytes();
            assert_eq!(out.len(), 23, "{}", out);
            assert_eq!(bytes[2], b'/');
            assert_eq!(bytes[5], b'/');
            assert_eq!(&out[10..12], ", ");
            assert!(out.ends_with(" AM") || out.ends_with(" PM"));
            let hour: u32 = out[12..14].parse().unwrap();
            assert!((1..=12).contains(&hour));
        }
    }

    #[test]
    fn test_invalid_timestamp() {
        let err = format_display_time(&Timestamp::from("yesterday")).unwrap_err();
        assert_eq!(err, FormatError::InvalidTimestamp("yesterday".to_string()));
    }

    #[test]
    fn test_out_of_range_millis() {
        let err = format_display_time(&Timestamp::Millis(i64::MAX)).unwrap_err();
        assert!(matches!(err, FormatError::OutOfRange(_)));
    }
}
