//! Materializes a repeat configuration into concrete meeting dates.

use agendaiq_core::constants::PREVIEW_CAP;
use chrono::NaiveDateTime;
use chrono_tz::Tz;

use super::datetime::parse_datetime;
use super::model::{RepeatConfig, SeriesEnd};
use super::pattern::next_date;

/// ## Summary
/// Generates the series for a start date given as an ISO-8601 string.
///
/// Returns an empty series when `start` is absent or does not parse.
#[must_use]
pub fn generate_series(start: Option<&str>, config: &RepeatConfig, zone: Tz) -> Vec<NaiveDateTime> {
    let Some(raw) = start else {
        tracing::debug!("No start date supplied, series is empty");
        return Vec::new();
    };
    let Some(start) = parse_datetime(raw, zone) else {
        tracing::debug!(start = %raw, "Invalid start date, series is empty");
        return Vec::new();
    };
    generate_series_from(start, config)
}

/// ## Summary
/// Generates the series from a parsed start, capping open-ended series at
/// [`PREVIEW_CAP`] iterations.
#[must_use]
pub fn generate_series_from(start: NaiveDateTime, config: &RepeatConfig) -> Vec<NaiveDateTime> {
    generate_series_capped(start, config, PREVIEW_CAP)
}

/// ## Summary
/// Generates the series with an explicit cap for `never` and `by` series.
///
/// The loop runs at most `occurrences` (for `after`) or `cap` iterations.
/// Each iteration stops if the current date is past the end limit, emits the
/// date unless it is an exception, and advances by the pattern. Exceptions
/// therefore still consume an iteration.
#[must_use]
pub fn generate_series_capped(
    start: NaiveDateTime,
    config: &RepeatConfig,
    cap: u32,
) -> Vec<NaiveDateTime> {
    let (max_iterations, end_limit) = match config.end {
        SeriesEnd::After { occurrences } => (occurrences.get(), None),
        SeriesEnd::By { until } => (cap, until),
        SeriesEnd::Never => (cap, None),
    };

    let mut dates = Vec::new();
    let mut current = start;

    for _ in 0..max_iterations {
        if end_limit.is_some_and(|limit| current > limit) {
            break;
        }

        if config.exceptions.contains(current) {
            tracing::trace!(date = %current, "Skipping exception date");
        } else {
            dates.push(current);
        }

        let Some(next) = next_date(current, config.pattern) else {
            tracing::debug!(date = %current, "Date arithmetic overflowed, ending series");
            break;
        };
        current = next;
    }

    dates
}
