//! Timestamp normalization for transcript records.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Offset-less layouts tried after RFC 3339. These are read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses ISO 8601 timestamp text into Unix epoch seconds.
///
/// Accepts RFC 3339 (`Z` is the same as `+00:00`) and offset-less
/// date-times. Absent or unparsable input yields `None`; callers leave such
/// records out of every time-based aggregate.
pub fn parse_timestamp(text: Option<&str>) -> Option<f64> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(to_epoch_seconds(dt.with_timezone(&Utc)));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| to_epoch_seconds(naive.and_utc()))
}

/// Converts a UTC datetime to fractional epoch seconds.
#[expect(
    clippy::cast_precision_loss,
    reason = "epoch seconds stay well inside the f64 mantissa"
)]
pub fn to_epoch_seconds(dt: DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1e9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_zulu_matches_utc_offset() {
        let zulu = parse_timestamp(Some("2026-01-29T10:00:00Z")).unwrap();
        let offset = parse_timestamp(Some("2026-01-29T10:00:00+00:00")).unwrap();
        assert!((zulu - offset).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_timestamp_epoch_origin() {
        assert_eq!(parse_timestamp(Some("1970-01-01T00:00:10Z")), Some(10.0));
    }

    #[test]
    fn test_parse_timestamp_keeps_fraction() {
        let ts = parse_timestamp(Some("1970-01-01T00:00:01.500Z")).unwrap();
        assert!((ts - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_timestamp_applies_offset() {
        let ts = parse_timestamp(Some("1970-01-01T02:00:00+02:00")).unwrap();
        assert!(ts.abs() < 1e-9);
    }

    #[test]
    fn test_parse_timestamp_naive_is_utc() {
        assert_eq!(parse_timestamp(Some("1970-01-01T00:01:00")), Some(60.0));
        assert_eq!(parse_timestamp(Some("1970-01-01 00:01:00.25")), Some(60.25));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(Some("not-a-timestamp")), None);
        assert_eq!(parse_timestamp(Some("")), None);
        assert_eq!(parse_timestamp(Some("2026-13-45T99:00:00Z")), None);
        assert_eq!(parse_timestamp(None), None);
    }
}
