//! RFC 5545 export of a repeat configuration for calendar clients.

use std::num::NonZeroU32;

use chrono::{Datelike, NaiveDateTime};
use rrule::{RRule, RRuleSet, Tz, Unvalidated};

use super::model::{
    CustomRule, MonthlyAnchor, Pattern, RepeatConfig, SeriesEnd, WeekOfMonth, WeekdaySet,
};
use super::pattern::{last_day_of_month, next_date, nth_weekday_of_month};
use crate::error::{RepeatError, RepeatResult};

/// ## Summary
/// Renders the configuration as an RRULE value (without the `RRULE:` prefix).
///
/// Fixed days above the 28th use `BYSETPOS=-1` over the candidate days so that
/// short months fall back to their last day, matching the series generator.
/// `monthly` without an anchor is emitted as plain `FREQ=MONTHLY`, which
/// calendar clients skip in months lacking the start day.
///
/// The rule alone describes the series only when it starts on its anchor
/// (a selected weekday, the fixed day, or the Nth weekday). For other starts
/// use [`to_rrule_set`], which carries the start as an RDATE.
///
/// ## Errors
/// Returns `RepeatError::RRuleError` if the rendered rule does not parse.
pub fn to_rrule(config: &RepeatConfig) -> RepeatResult<String> {
    render(config.pattern, config.end)
}

fn render(pattern: Pattern, end: SeriesEnd) -> RepeatResult<String> {
    let mut parts = pattern_parts(pattern);

    match end {
        SeriesEnd::After { occurrences } => parts.push(format!("COUNT={occurrences}")),
        SeriesEnd::By { until: Some(until) } => {
            parts.push(format!("UNTIL={}", until.format("%Y%m%dT%H%M%SZ")));
        }
        SeriesEnd::By { until: None } | SeriesEnd::Never => {}
    }

    let text = parts.join(";");
    // Round-trip through the parser so callers never receive a rule that
    // calendar clients would reject.
    text.parse::<RRule<Unvalidated>>()?;
    tracing::trace!(rrule = %text, "Rendered RRULE");
    Ok(text)
}

/// ## Summary
/// Builds a rule set that expands to the same dates as the series generator,
/// with each exception day attached as an EXDATE at the meeting's time of day.
///
/// A start that is off the pattern's anchor is kept as an RDATE. The rule then
/// begins at the generator's second date and its COUNT drops by one.
///
/// Wall-clock times are anchored in UTC.
///
/// ## Errors
/// Returns `RepeatError::RRuleError` if the rule fails parsing or validation.
/// Returns `RepeatError::ValidationError` if the series cannot advance past
/// an off-anchor start.
pub fn to_rrule_set(start: NaiveDateTime, config: &RepeatConfig) -> RepeatResult<RRuleSet> {
    let rrule_set = if ends_before(config.end, start) {
        RRuleSet::new(as_utc(start))
    } else if starts_on_anchor(start, config.pattern) {
        to_rrule(config)?
            .parse::<RRule<Unvalidated>>()?
            .build(as_utc(start))?
    } else {
        off_anchor_set(start, config)?
    };

    if config.exceptions.is_empty() {
        return Ok(rrule_set);
    }

    let exdates = config
        .exceptions
        .iter()
        .map(|day| as_utc(day.and_time(start.time())))
        .collect();
    Ok(rrule_set.set_exdates(exdates))
}

fn off_anchor_set(start: NaiveDateTime, config: &RepeatConfig) -> RepeatResult<RRuleSet> {
    let rest_end = match config.end {
        SeriesEnd::After { occurrences } => match NonZeroU32::new(occurrences.get() - 1) {
            Some(rest) => SeriesEnd::After { occurrences: rest },
            None => return Ok(RRuleSet::new(as_utc(start)).set_rdates(vec![as_utc(start)])),
        },
        end => end,
    };
    let second = next_date(start, config.pattern).ok_or_else(|| {
        RepeatError::ValidationError(format!("series starting {start} cannot advance"))
    })?;
    if ends_before(rest_end, second) {
        return Ok(RRuleSet::new(as_utc(start)).set_rdates(vec![as_utc(start)]));
    }

    tracing::trace!(start = %start, second = %second, "Start is off the anchor, adding RDATE");
    Ok(render(config.pattern, rest_end)?
        .parse::<RRule<Unvalidated>>()?
        .build(as_utc(second))?
        .set_rdates(vec![as_utc(start)]))
}

fn ends_before(end: SeriesEnd, at: NaiveDateTime) -> bool {
    matches!(end, SeriesEnd::By { until: Some(until) } if until < at)
}

/// True if the rule anchored at `start` yields `start` as its first date.
fn starts_on_anchor(start: NaiveDateTime, pattern: Pattern) -> bool {
    match pattern {
        Pattern::Custom(CustomRule::Weekdays(days)) => days.contains(start.weekday()),
        Pattern::Monthly(MonthlyAnchor::DayOfMonth(day)) => {
            last_day_of_month(start.year(), start.month())
                .is_some_and(|last| start.day() == day.get().min(last))
        }
        Pattern::Monthly(MonthlyAnchor::NthWeekday { week, weekday }) => {
            nth_weekday_of_month(start.year(), start.month(), week, weekday)
                == Some(start.date())
        }
        Pattern::Daily { .. }
        | Pattern::Weekly
        | Pattern::Biweekly
        | Pattern::Monthly(MonthlyAnchor::SameDay)
        | Pattern::Custom(CustomRule::EveryNDays(_)) => true,
    }
}

fn as_utc(at: NaiveDateTime) -> chrono::DateTime<Tz> {
    at.and_utc().with_timezone(&Tz::UTC)
}

fn pattern_parts(pattern: Pattern) -> Vec<String> {
    match pattern {
        Pattern::Daily { interval } | Pattern::Custom(CustomRule::EveryNDays(interval)) => {
            vec!["FREQ=DAILY".to_string(), format!("INTERVAL={interval}")]
        }
        Pattern::Weekly => vec!["FREQ=WEEKLY".to_string()],
        Pattern::Biweekly => vec!["FREQ=WEEKLY".to_string(), "INTERVAL=2".to_string()],
        Pattern::Monthly(MonthlyAnchor::SameDay) => vec!["FREQ=MONTHLY".to_string()],
        Pattern::Monthly(MonthlyAnchor::DayOfMonth(day)) => {
            let day = day.get();
            if day <= 28 {
                vec!["FREQ=MONTHLY".to_string(), format!("BYMONTHDAY={day}")]
            } else {
                let candidates = (28..=day).map(|d| d.to_string()).collect::<Vec<_>>();
                vec![
                    "FREQ=MONTHLY".to_string(),
                    format!("BYMONTHDAY={}", candidates.join(",")),
                    "BYSETPOS=-1".to_string(),
                ]
            }
        }
        Pattern::Monthly(MonthlyAnchor::NthWeekday { week, weekday }) => {
            let ordinal = match week {
                WeekOfMonth::First => "1",
                WeekOfMonth::Second => "2",
                WeekOfMonth::Third => "3",
                WeekOfMonth::Fourth => "4",
                WeekOfMonth::Last => "-1",
            };
            vec![
                "FREQ=MONTHLY".to_string(),
                format!("BYDAY={ordinal}{}", weekday_code(weekday)),
            ]
        }
        Pattern::Custom(CustomRule::Weekdays(days)) => {
            vec!["FREQ=WEEKLY".to_string(), format!("BYDAY={}", byday_list(days))]
        }
    }
}

fn byday_list(days: WeekdaySet) -> String {
    days.iter().map(weekday_code).collect::<Vec<_>>().join(",")
}

const fn weekday_code(day: chrono::Weekday) -> &'static str {
    match day {
        chrono::Weekday::Mon => "MO",
        chrono::Weekday::Tue => "TU",
        chrono::Weekday::Wed => "WE",
        chrono::Weekday::Thu => "TH",
        chrono::Weekday::Fri => "FR",
        chrono::Weekday::Sat => "SA",
        chrono::Weekday::Sun => "SU",
    }
}
