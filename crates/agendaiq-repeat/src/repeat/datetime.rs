//! Lenient parsing and display of the date strings the meeting form sends.
//!
//! Every parser here returns `None` instead of an error: a malformed date in a
//! repeat configuration degrades to "absent" rather than failing the preview.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// ## Summary
/// Parses an ISO-8601 date or date-time into wall-clock time.
///
/// Offset-bearing values (`...Z`, `...+02:00`) are converted into `zone`
/// first; naive values are taken as already local. A bare date is midnight.
#[must_use]
pub fn parse_datetime(value: &str, zone: Tz) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&zone).naive_local());
    }

    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(naive);
    }

    parse_bare_date(value).map(|date| date.and_time(NaiveTime::MIN))
}

/// ## Summary
/// Parses a date or date-time and keeps only its calendar day.
#[must_use]
pub fn parse_date(value: &str, zone: Tz) -> Option<NaiveDate> {
    parse_datetime(value, zone).map(|dt| dt.date())
}

/// ## Summary
/// Parses the inclusive upper bound of a `by` series.
///
/// A bare date covers the whole day, so a meeting at 10:00 on the end date is
/// still part of the series. A date-time is used as given.
#[must_use]
pub fn parse_end_limit(value: &str, zone: Tz) -> Option<NaiveDateTime> {
    if let Some(date) = parse_bare_date(value.trim()) {
        return date.and_hms_milli_opt(23, 59, 59, 999);
    }
    parse_datetime(value, zone)
}

/// ## Summary
/// Inverse of [`parse_end_limit`]: whole-day limits render as a bare date.
#[must_use]
pub fn format_end_limit(limit: NaiveDateTime) -> String {
    if Some(limit.time()) == NaiveTime::from_hms_milli_opt(23, 59, 59, 999) {
        limit.date().format(DATE_FORMAT).to_string()
    } else {
        limit.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// `2024-01-05`
#[must_use]
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_bare_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// `Jan 05, 2024`
#[must_use]
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// `Fri, Jan 05, 2024`
#[must_use]
pub fn format_preview_date(date: NaiveDate) -> String {
    date.format("%a, %b %d, %Y").to_string()
}
