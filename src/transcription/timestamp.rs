//! Conversion between `HH:MM:SS.mmm` clock strings and numeric offsets.

use crate::error::{LecternError, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):([0-5]\d):([0-5]\d)\.(\d{3})$").expect("Invalid timestamp regex")
});

// Trailing text after the second timestamp is WebVTT cue settings (`align:start` etc).
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*(\d+:[0-5]\d:[0-5]\d\.\d{3})",
        r"\s*-->\s*",
        r"(\d+:[0-5]\d:[0-5]\d\.\d{3})(?:\s+.*)?$",
    ))
    .expect("Invalid time range regex")
});

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// A caption offset with millisecond precision.
///
/// Displays and serializes as `HH:MM:SS.mmm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Build a timestamp from seconds, rounding to the nearest millisecond.
    /// Negative and non-finite inputs clamp to zero.
    pub fn from_seconds(seconds: f64) -> Self {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Self::ZERO;
        }
        Self((seconds * 1000.0).round() as u64)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn as_seconds(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Parse a strict `HH:MM:SS.mmm` string.
    pub fn parse(s: &str) -> Result<Self> {
        let caps = TIMESTAMP_RE
            .captures(s.trim())
            .ok_or_else(|| LecternError::Format(format!("'{}' is not HH:MM:SS.mmm", s)))?;

        let group = |i: usize| -> Result<u64> {
            caps[i]
                .parse::<u64>()
                .map_err(|e| LecternError::Format(format!("'{}': {}", s, e)))
        };

        let hours = group(1)?;
        let minutes = group(2)?;
        let seconds = group(3)?;
        let millis = group(4)?;

        let clock = minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + millis;
        hours
            .checked_mul(MS_PER_HOUR)
            .and_then(|ms| ms.checked_add(clock))
            .map(Self)
            .ok_or_else(|| LecternError::Format(format!("'{}' is out of range", s)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / MS_PER_HOUR;
        let minutes = (self.0 % MS_PER_HOUR) / MS_PER_MINUTE;
        let secs = (self.0 % MS_PER_MINUTE) / MS_PER_SECOND;
        let ms = self.0 % MS_PER_SECOND;
        write!(f, "{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, ms)
    }
}

impl FromStr for Timestamp {
    type Err = LecternError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Convert a `HH:MM:SS.mmm` string to seconds.
pub fn timestamp_to_seconds(s: &str) -> Result<f64> {
    Timestamp::parse(s).map(|t| t.as_seconds())
}

/// Convert seconds to a `HH:MM:SS.mmm` string.
pub fn seconds_to_timestamp(seconds: f64) -> String {
    Timestamp::from_seconds(seconds).to_string()
}

/// Check whether a string is a well-formed `HH:MM:SS.mmm` timestamp.
pub fn is_valid_timestamp(s: &str) -> bool {
    Timestamp::parse(s).is_ok()
}

/// Match a `T1 --> T2` cue timing line.
///
/// Returns `None` instead of an error when the line is not a time range.
pub fn parse_time_range(line: &str) -> Option<(Timestamp, Timestamp)> {
    let caps = RANGE_RE.captures(line)?;
    let start = Timestamp::parse(&caps[1]).ok()?;
    let end = Timestamp::parse(&caps[2]).ok()?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_seconds() {
        assert_eq!(timestamp_to_seconds("00:00:00.000").unwrap(), 0.0);
        assert_eq!(timestamp_to_seconds("00:01:01.500").unwrap(), 61.5);
        assert_eq!(timestamp_to_seconds("01:01:01.123").unwrap(), 3661.123);
    }

    #[test]
    fn test_seconds_to_timestamp() {
        assert_eq!(seconds_to_timestamp(0.0), "00:00:00.000");
        assert_eq!(seconds_to_timestamp(61.5), "00:01:01.500");
        assert_eq!(seconds_to_timestamp(3661.123), "01:01:01.123");
        assert_eq!(seconds_to_timestamp(-4.0), "00:00:00.000");
    }

    #[test]
    fn test_round_trip_millisecond_precision() {
        for h in [0u64, 1, 9, 23] {
            for m in [0u64, 7, 59] {
                for s in [0u64, 30, 59] {
                    for ms in [0u64, 1, 499, 999] {
                        let millis = h * MS_PER_HOUR + m * MS_PER_MINUTE + s * MS_PER_SECOND + ms;
                        let seconds = millis as f64 / 1000.0;
                        let text = seconds_to_timestamp(seconds);
                        let back = timestamp_to_seconds(&text).unwrap();
                        assert_eq!(Timestamp::from_seconds(back).as_millis(), millis, "{}", text);
                    }
                }
            }
        }
    }

    #[test]
    fn test_rejects_malformed() {
        let malformed = [
            "",
            "00:00.000",
            "00:00:00",
            "00:00:00,000",
            "00:60:00.000",
            "aa:00:00.000",
            "00:00:00.0000",
        ];
        for bad in malformed {
            assert!(!is_valid_timestamp(bad), "{}", bad);
            assert!(matches!(timestamp_to_seconds(bad), Err(LecternError::Format(_))), "{}", bad);
        }
        assert!(is_valid_timestamp("12:34:56.789"));
    }

    #[test]
    fn test_parse_time_range() {
        let (start, end) = parse_time_range("00:00:01.000 --> 00:00:04.250").unwrap();
        assert_eq!(start.as_millis(), 1_000);
        assert_eq!(end.as_millis(), 4_250);

        let with_settings =
            parse_time_range("00:00:01.000 --> 00:00:02.000 align:start position:10%");
        assert!(with_settings.is_some());

        let (start, end) = parse_time_range("00:00:00.000-->00:00:03.000").unwrap();
        assert_eq!(start, Timestamp::ZERO);
        assert_eq!(end.as_millis(), 3_000);
        assert!(parse_time_range("00:00:00.000-->00:00:03.000 line:0").is_some());

        assert!(parse_time_range("00:00:01.000 -> 00:00:02.000").is_none());
        assert!(parse_time_range("00:00:01,000 --> 00:00:02,000").is_none());
        assert!(parse_time_range("Step 1 is easy").is_none());
    }

    #[test]
    fn test_huge_hours_are_format_errors() {
        let huge = "99999999999999:00:00.000";
        assert!(matches!(timestamp_to_seconds(huge), Err(LecternError::Format(_))));
        assert!(!is_valid_timestamp(huge));
        assert!(parse_time_range(&format!("{} --> {}", huge, huge)).is_none());

        // Largest hour count that still fits in u64 milliseconds.
        let max_hours = u64::MAX / MS_PER_HOUR;
        assert!(Timestamp::parse(&format!("{}:00:00.000", max_hours)).is_ok());
        assert!(Timestamp::parse(&format!("{}:59:59.999", max_hours + 1)).is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let ts = Timestamp::from_millis(65_432);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"00:01:05.432\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}
