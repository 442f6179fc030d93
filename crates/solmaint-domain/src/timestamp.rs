//! ISO-8601 timestamps that keep their stored text

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Format of timestamps minted here: microsecond precision and a `Z` suffix,
/// so the string form sorts the same way as the instant it represents.
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// A point in time exactly as it was written.
///
/// New timestamps serialize as e.g. `2024-05-01T08:30:00.000000Z`. Timestamps
/// read from disk keep their original text byte for byte (naive ISO strings,
/// seven fractional digits, even values that are not dates at all), so a
/// record is never rewritten by being loaded and saved again.
///
/// Ordering compares instants: naive values are taken as UTC, unparseable
/// values sort before every parseable one, and ties fall back to the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp(String);

impl Timestamp {
    /// Current time
    ///
    /// # Examples
    ///
    /// ```
    /// use solmaint_domain::Timestamp;
    ///
    /// let a = Timestamp::now();
    /// let b = Timestamp::now();
    /// assert!(a <= b);
    /// ```
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Format an instant, truncated to microseconds
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(6).format(WIRE_FORMAT).to_string())
    }

    /// Wrap stored text without checking it
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The text as stored
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The instant this text denotes, if it parses
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.0).ok()
    }

    /// Parse an ISO-8601 timestamp, keeping the given text
    ///
    /// Accepts RFC 3339, naive date-times (taken as UTC) and plain dates.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        parse_instant(s)?;
        Ok(Self(s.to_string()))
    }
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let s = s.trim();
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(rfc_err) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
            .or_else(|_| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::default()))
            })
            .map(|naive| naive.and_utc())
            .map_err(|_| rfc_err),
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_datetime()
            .cmp(&other.as_datetime())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wire_format_is_fixed_width() {
        let ts = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        assert_eq!(ts.to_string(), "2024-01-02T03:04:05.000000Z");
        assert_eq!(Timestamp::now().to_string().len(), ts.to_string().len());
    }

    #[test]
    fn test_parse_keeps_text() {
        for raw in [
            "2024-06-30T12:00:00.123456",
            "2024-03-01T10:00:00.1234567",
            "2024-06-30T14:00:00+02:00",
        ] {
            assert_eq!(Timestamp::parse(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_offsets_compare_as_utc() {
        let ts = Timestamp::parse("2024-06-30T14:00:00+02:00").unwrap();
        assert_eq!(
            ts.as_datetime(),
            Some(Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap())
        );
        assert!(ts < Timestamp::parse("2024-06-30T12:30:00Z").unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Timestamp::parse("yesterday").is_err());
        assert!(Timestamp::parse("2024-13-01").is_err());
    }

    #[test]
    fn test_deserialize_accepts_any_string_verbatim() {
        let ts: Timestamp = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(ts.as_str(), "unknown");
        assert!(ts.as_datetime().is_none());
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"unknown\"");

        let naive: Timestamp = serde_json::from_str("\"2024-03-01T10:00:00.1234567\"").unwrap();
        assert_eq!(
            serde_json::to_string(&naive).unwrap(),
            "\"2024-03-01T10:00:00.1234567\""
        );
    }

    #[test]
    fn test_unparseable_sorts_first() {
        let garbage = Timestamp::from_raw("unknown");
        let real = Timestamp::parse("1970-01-01T00:00:00Z").unwrap();
        assert!(garbage < real);
    }

    #[test]
    fn test_mixed_precision_orders_by_instant() {
        let seven = Timestamp::parse("2024-03-01T10:00:00.1234567").unwrap();
        let six = Timestamp::parse("2024-03-01T10:00:00.123457Z").unwrap();
        assert!(seven < six);
    }

    #[test]
    fn test_serde_round_trip() {
        let ts = Timestamp::now();
        let json = serde_json::to_string(&ts).unwrap();
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, back);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: display then parse is lossless
        #[test]
        fn test_display_parse_roundtrip(secs in 0i64..4_102_444_800, micros in 0u32..1_000_000) {
            let dt = DateTime::from_timestamp(secs, micros * 1_000).unwrap();
            let ts = Timestamp::from_datetime(dt);
            prop_assert_eq!(ts.as_datetime(), Some(dt));
            prop_assert_eq!(Timestamp::parse(&ts.to_string()).unwrap(), ts);
        }

        /// Property: string order agrees with chronological order for minted values
        #[test]
        fn test_lexicographic_order(a in 0i64..4_102_444_800, b in 0i64..4_102_444_800) {
            let ta = Timestamp::from_datetime(DateTime::from_timestamp(a, 0).unwrap());
            let tb = Timestamp::from_datetime(DateTime::from_timestamp(b, 0).unwrap());
            prop_assert_eq!(ta.cmp(&tb), ta.to_string().cmp(&tb.to_string()));
        }
    }
}
