//! Date and timestamp decoders.
//!
//! Firebolt sends date/time values as text:
//! - DATE: `2023-01-05`
//! - TIMESTAMP: `2023-01-05 17:04:42` or `2023-01-05 17:04:42.123456`
//! - TIMESTAMPTZ: a TIMESTAMP followed by an offset, `+05`, `+05:30` or
//!   `+05:30:15` (also `+0530`)
//!
//! Timestamp layouts are tried in order and the first that parses wins.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};
use crate::protocol::constants::{
    DATE_LAYOUT, TIMESTAMPTZ_LAYOUT, TIMESTAMP_LAYOUT, TIMESTAMP_MICROS_LAYOUT,
};

const TIMESTAMP_LAYOUTS: [&str; 2] = [TIMESTAMP_MICROS_LAYOUT, TIMESTAMP_LAYOUT];

const OFFSET_SIGNS: [char; 3] = ['+', '-', '\u{2212}'];

/// Decode a DATE value.
pub fn decode_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_LAYOUT)
        .map_err(|_| Error::decode("date", format!("'{}'", text)))
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
}

/// Decode a TIMESTAMP value (no zone).
pub fn decode_timestamp(text: &str) -> Result<NaiveDateTime> {
    parse_naive(text).ok_or_else(|| Error::decode("timestamp", format!("'{}'", text)))
}

/// Seconds of a `:SS` offset suffix left over after the `±HH:MM` part.
fn offset_seconds(rest: &str) -> Option<i32> {
    let digits = rest.strip_prefix(':')?;
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let seconds: i32 = digits.parse().ok()?;
    (seconds < 60).then_some(seconds)
}

/// Decode a TIMESTAMPTZ value, keeping the offset it was sent with.
pub fn decode_timestamptz(text: &str) -> Result<DateTime<FixedOffset>> {
    let error = || Error::decode("timestamptz", format!("'{}'", text));

    let (ts, rest) = DateTime::<FixedOffset>::parse_and_remainder(text, TIMESTAMPTZ_LAYOUT)
        .map_err(|_| error())?;
    if rest.is_empty() {
        return Ok(ts);
    }

    // `-00:00:SS` parses as a zero offset, so the sign is read back from the text.
    let seconds = offset_seconds(rest).ok_or_else(error)?;
    let head = &text[..text.len() - rest.len()];
    let time = head.find(' ').map(|pos| &head[pos..]).ok_or_else(error)?;
    let sign_pos = time.rfind(OFFSET_SIGNS).ok_or_else(error)?;
    let seconds = if time[sign_pos..].starts_with('+') { seconds } else { -seconds };

    let offset = FixedOffset::east_opt(ts.offset().local_minus_utc() + seconds).ok_or_else(error)?;
    ts.naive_local().and_local_timezone(offset).single().ok_or_else(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Utc};

    #[test]
    fn test_decode_date() {
        let d = decode_date("2023-01-05").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2023, 1, 5));
        assert!(decode_date("2023-13-05").is_err());
        assert!(decode_date("05/01/2023").is_err());
    }

    #[test]
    fn test_decode_timestamp_seconds() {
        let ts = decode_timestamp("2023-01-05 17:04:42").unwrap();
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (17, 4, 42));
        assert_eq!(ts.nanosecond(), 0);
    }

    #[test]
    fn test_decode_timestamp_micros() {
        let ts = decode_timestamp("2023-01-05 17:04:42.123456").unwrap();
        assert_eq!(ts.nanosecond(), 123_456_000);

        let ts = decode_timestamp("2023-01-05 17:04:42.1234").unwrap();
        assert_eq!(ts.nanosecond(), 123_400_000);
    }

    #[test]
    fn test_decode_timestamp_invalid() {
        assert!(decode_timestamp("2023-01-05").is_err());
        assert!(decode_timestamp("2023-01-05 25:00:00").is_err());
        assert!(decode_timestamp("2023-01-05 17:04:42+00").is_err());
    }

    #[test]
    fn test_decode_timestamptz_hour_offset() {
        let ts = decode_timestamptz("2023-01-05 17:04:42.1234+02").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(ts.hour(), 17);
        assert_eq!(ts.with_timezone(&Utc).hour(), 15);
        assert_eq!(ts.nanosecond(), 123_400_000);
    }

    #[test]
    fn test_decode_timestamptz_minute_offset() {
        let ts = decode_timestamptz("2023-01-05 17:04:42+05:30").unwrap();
        let utc = ts.with_timezone(&Utc);
        assert_eq!((utc.hour(), utc.minute()), (11, 34));

        let ts = decode_timestamptz("2023-01-05 17:04:42-0330").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), -(3 * 3600 + 30 * 60));
    }

    #[test]
    fn test_decode_timestamptz_second_offset() {
        let ts = decode_timestamptz("1900-01-01 00:00:00+00:19:32").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 19 * 60 + 32);
    }

    #[test]
    fn test_decode_timestamptz_utc_day_rollover() {
        let ts = decode_timestamptz("2023-01-05 01:00:00-03").unwrap();
        let utc = ts.with_timezone(&Utc);
        assert_eq!((utc.day(), utc.hour()), (5, 4));

        let ts = decode_timestamptz("2023-01-05 01:00:00+03").unwrap();
        let utc = ts.with_timezone(&Utc);
        assert_eq!((utc.day(), utc.hour()), (4, 22));
    }

    #[test]
    fn test_decode_timestamptz_invalid() {
        assert!(decode_timestamptz("2023-01-05 17:04:42").is_err());
        assert!(decode_timestamptz("2023-01-05").is_err());
        assert!(decode_timestamptz("2023-01-05 17:04:42+5:3:0:1").is_err());
        assert!(decode_timestamptz("2023-01-05 17:04:42+05:61").is_err());
        assert!(decode_timestamptz("2023-01-05 17:04:42+ab").is_err());
        assert!(decode_timestamptz("2023-01-05 17:04:42+05:30:7").is_err());
        assert!(decode_timestamptz("2023-01-05 17:04:42+05:30:60").is_err());
        assert!(decode_timestamptz("2023-01-05 17:04:42Z:30").is_err());
    }

    #[test]
    fn test_decode_timestamptz_negative_second_offset() {
        let ts = decode_timestamptz("2023-01-05 17:04:42-00:00:30").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), -30);

        let ts = decode_timestamptz("2023-01-05 17:04:42-03:30:15").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), -(3 * 3600 + 30 * 60 + 15));
    }

    #[test]
    fn test_decode_timestamptz_non_ascii_offset() {
        for text in [
            "2023-01-05 17:04:42+a\u{e9}b",
            "2023-01-05 17:04:42+\u{e9}\u{e9}",
            "2023-01-05 17:04:42+05:\u{1f600}",
            "2023-01-05 17:04:42+05:30:\u{e9}",
        ] {
            assert!(decode_timestamptz(text).is_err(), "{:?}", text);
        }
    }
}
