// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time normalization and formatting.
//!
//! All timestamps handled by the crate are `DateTime<Utc>`. Graph returns
//! naive timestamps (the zone travels in a sibling field) and is read through
//! [`resolve_zoned_timestamp`]; Azure DevOps returns RFC 3339, read through
//! [`parse_timestamp`].

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat,
    TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;

/// Smallest unit Azure DevOps keeps on capacity dates (100 ns).
pub const TICK: Duration = Duration::nanoseconds(100);

/// Format a UTC timestamp as whole-second RFC3339 using a `Z` suffix.
///
/// This is the form the Graph `calendarView` query parameters expect.
pub fn format_utc_query(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Midnight at the start of the given day.
pub fn start_of_day(date: DateTime<Utc>) -> DateTime<Utc> {
    date.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// The last tick of the given day: next midnight minus [`TICK`].
pub fn end_of_day_inclusive(date: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1) - TICK
}

/// Parse a timestamp from either remote service.
///
/// Accepts RFC 3339 (converted to UTC), naive `YYYY-MM-DDTHH:MM:SS[.fffffff]`
/// (read as UTC) and bare dates (read as UTC midnight).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    parse_naive(raw).map(|naive| naive.and_utc())
}

fn parse_naive(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
}

/// Failure to place a zoned wall-clock time on the UTC timeline.
#[derive(Debug, thiserror::Error)]
pub enum ZonedTimestampError {
    #[error("invalid timestamp {raw:?}: {source}")]
    Parse {
        raw: String,
        source: chrono::ParseError,
    },

    #[error("unknown time zone {0:?}")]
    UnknownZone(String),

    #[error("{raw} does not exist in time zone {zone}")]
    Nonexistent { raw: String, zone: String },
}

/// Convert a wall-clock time labelled with a zone name to UTC.
///
/// Timestamps carrying their own offset ignore `zone`. A missing or `UTC`
/// zone reads the time as UTC; other zones must be IANA names. A time that
/// occurs twice (DST fall-back) resolves to the earlier instant.
pub fn resolve_zoned_timestamp(
    raw: &str,
    zone: Option<&str>,
) -> Result<DateTime<Utc>, ZonedTimestampError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = parse_naive(raw).map_err(|source| ZonedTimestampError::Parse {
        raw: raw.to_string(),
        source,
    })?;

    let zone = match zone.map(str::trim).filter(|z| !z.is_empty()) {
        None => return Ok(naive.and_utc()),
        Some(z) if z.eq_ignore_ascii_case("utc") => return Ok(naive.and_utc()),
        Some(z) => z,
    };
    let tz: Tz = zone
        .parse()
        .map_err(|_| ZonedTimestampError::UnknownZone(zone.to_string()))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
        LocalResult::None => Err(ZonedTimestampError::Nonexistent {
            raw: raw.to_string(),
            zone: zone.to_string(),
        }),
    }
}

/// Format a capacity date the way Azure DevOps writes them.
///
/// Sub-second precision is kept in ticks (7 digits) so the end-of-day
/// boundary survives a round trip.
pub fn format_capacity_timestamp(date: DateTime<Utc>) -> String {
    let base = date.format("%Y-%m-%dT%H:%M:%S");
    let nanos = date.nanosecond() % 1_000_000_000;
    if nanos == 0 {
        format!("{base}Z")
    } else if nanos % 100 == 0 {
        format!("{base}.{:07}Z", nanos / 100)
    } else {
        format!("{base}.{nanos:09}Z")
    }
}

/// Serde adapter for optional capacity dates.
pub mod capacity_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&super::format_capacity_timestamp(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_timestamp(s)
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {s:?}: {e}"))),
        }
    }
}

/// Serde adapter for required timestamps (sprint attributes).
pub mod lenient_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_utc_query_drops_fraction() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 3, 9, 30, 15).unwrap() + Duration::milliseconds(250);
        assert_eq!(format_utc_query(dt), "2024-01-03T09:30:15Z");
    }

    #[test]
    fn test_day_boundaries() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 5, 14, 45, 0).unwrap();
        assert_eq!(
            start_of_day(dt),
            Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap()
        );
        assert_eq!(
            end_of_day_inclusive(dt),
            Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap() - TICK
        );
        assert_eq!(
            format_capacity_timestamp(end_of_day_inclusive(dt)),
            "2024-01-05T23:59:59.9999999Z"
        );
    }

    #[test]
    fn test_end_of_day_at_midnight_stays_on_same_day() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(
            end_of_day_inclusive(midnight).date_naive(),
            midnight.date_naive()
        );
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-03T09:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-03T10:00:00+01:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-03T09:00:00.0000000").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2024-01-03").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()
        );
        assert!(parse_timestamp("next tuesday").is_err());
    }

    #[test]
    fn test_zoned_timestamp_converts_named_zone() {
        // PST is UTC-8 in January
        let dt =
            resolve_zoned_timestamp("2024-01-03T17:00:00.0000000", Some("America/Los_Angeles"))
                .unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 4, 1, 0, 0).unwrap());
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
    }

    #[test]
    fn test_zoned_timestamp_utc_and_offsets() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap();
        assert_eq!(resolve_zoned_timestamp("2024-01-03T09:00:00", None).unwrap(), expected);
        assert_eq!(
            resolve_zoned_timestamp("2024-01-03T09:00:00", Some("utc")).unwrap(),
            expected
        );
        // Explicit offset wins over the zone label
        assert_eq!(
            resolve_zoned_timestamp("2024-01-03T10:00:00+01:00", Some("Asia/Tokyo")).unwrap(),
            expected
        );
    }

    #[test]
    fn test_zoned_timestamp_rejects_unresolvable_zones() {
        assert!(matches!(
            resolve_zoned_timestamp("2024-01-03T09:00:00", Some("Pacific Standard Time")),
            Err(ZonedTimestampError::UnknownZone(_))
        ));
        // Skipped by the spring-forward transition
        assert!(matches!(
            resolve_zoned_timestamp("2024-03-10T02:30:00", Some("America/New_York")),
            Err(ZonedTimestampError::Nonexistent { .. })
        ));
        assert!(matches!(
            resolve_zoned_timestamp("soon", Some("UTC")),
            Err(ZonedTimestampError::Parse { .. })
        ));
    }

    #[test]
    fn test_capacity_timestamp_whole_seconds() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        assert_eq!(format_capacity_timestamp(dt), "2024-01-03T00:00:00Z");
    }

    #[test]
    fn test_capacity_timestamp_roundtrips_ticks() {
        let dt = end_of_day_inclusive(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap());
        let parsed = parse_timestamp(&format_capacity_timestamp(dt)).unwrap();
        assert_eq!(parsed, dt);
    }
}
