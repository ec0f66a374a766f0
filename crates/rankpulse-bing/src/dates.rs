//! Date parsing for the Bing Webmaster API.
//!
//! Depending on the endpoint version, the `Date` field arrives either as
//! an ISO string (`"2025-11-03"` or `"2025-11-03T00:00:00"`) or as the
//! legacy WCF serialized-date token `/Date(1623456780000)/`, optionally
//! with a signed UTC-offset suffix (`/Date(1623456780000-0700)/`).

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

static LEGACY_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/Date\((-?\d+)(?:[+-]\d{4})?\)/$").expect("legacy date pattern is valid")
});

/// Parses a Bing stat date in either wire form into a UTC calendar date.
///
/// Returns `None` for anything unrecognized; callers drop such rows
/// rather than failing the fetch.
#[must_use]
pub fn parse_stat_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Some(captures) = LEGACY_DATE.captures(raw) {
        let millis: i64 = captures[1].parse().ok()?;
        return DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive());
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_legacy_serialized_tokens() {
        // 2021-06-11T23:33:00Z
        assert_eq!(
            parse_stat_date("/Date(1623454380000)/"),
            Some(date(2021, 6, 11))
        );
    }

    #[test]
    fn parses_legacy_tokens_with_offset_suffix() {
        assert_eq!(
            parse_stat_date("/Date(1623454380000-0700)/"),
            Some(date(2021, 6, 11))
        );
        assert_eq!(
            parse_stat_date("/Date(1623454380000+0200)/"),
            Some(date(2021, 6, 11))
        );
    }

    #[test]
    fn parses_iso_dates_and_datetimes() {
        assert_eq!(parse_stat_date("2025-11-03"), Some(date(2025, 11, 3)));
        assert_eq!(
            parse_stat_date("2025-11-03T00:00:00"),
            Some(date(2025, 11, 3))
        );
        assert_eq!(
            parse_stat_date("2025-11-03T10:30:00Z"),
            Some(date(2025, 11, 3))
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_stat_date("").is_none());
        assert!(parse_stat_date("/Date(abc)/").is_none());
        assert!(parse_stat_date("03/11/2025").is_none());
        assert!(parse_stat_date("/Date(1623454380000").is_none());
    }
}
