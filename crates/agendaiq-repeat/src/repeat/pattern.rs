//! Next-occurrence arithmetic for each repeat pattern.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, Weekday};

use super::model::{CustomRule, DayOfMonth, MonthlyAnchor, Pattern, WeekOfMonth, WeekdaySet};

const ONE_WEEK: Days = Days::new(7);
const TWO_WEEKS: Days = Days::new(14);
const ONE_MONTH: Months = Months::new(1);

/// ## Summary
/// Computes the occurrence that follows `current` under `pattern`.
///
/// Time-of-day is carried over unchanged. Returns `None` only when the result
/// would fall outside chrono's representable range.
#[must_use]
pub fn next_date(current: NaiveDateTime, pattern: Pattern) -> Option<NaiveDateTime> {
    match pattern {
        Pattern::Daily { interval } => current.checked_add_days(Days::new(u64::from(interval.get()))),
        Pattern::Weekly => current.checked_add_days(ONE_WEEK),
        Pattern::Biweekly => current.checked_add_days(TWO_WEEKS),
        Pattern::Monthly(anchor) => next_monthly(current, anchor),
        Pattern::Custom(CustomRule::Weekdays(days)) => next_selected_weekday(current, days),
        Pattern::Custom(CustomRule::EveryNDays(interval)) => {
            current.checked_add_days(Days::new(u64::from(interval.get())))
        }
    }
}

fn next_monthly(current: NaiveDateTime, anchor: MonthlyAnchor) -> Option<NaiveDateTime> {
    // chrono clamps Jan 31 + 1 month to the last day of February.
    let next_month = current.checked_add_months(ONE_MONTH)?;
    match anchor {
        MonthlyAnchor::SameDay => Some(next_month),
        MonthlyAnchor::DayOfMonth(day) => clamp_to_day(next_month, day),
        MonthlyAnchor::NthWeekday { week, weekday } => {
            let date = nth_weekday_of_month(next_month.year(), next_month.month(), week, weekday)?;
            Some(date.and_time(current.time()))
        }
    }
}

fn clamp_to_day(in_month: NaiveDateTime, day: DayOfMonth) -> Option<NaiveDateTime> {
    let last = last_day_of_month(in_month.year(), in_month.month())?;
    in_month.with_day(day.get().min(last))
}

fn next_selected_weekday(current: NaiveDateTime, days: WeekdaySet) -> Option<NaiveDateTime> {
    (1..=7u64)
        .filter_map(|offset| current.checked_add_days(Days::new(offset)))
        .find(|candidate| days.contains(candidate.weekday()))
        .or_else(|| current.checked_add_days(ONE_WEEK))
}

/// ## Summary
/// Number of days in the given month.
#[must_use]
pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(ONE_MONTH)?.pred_opt()?;
    Some(last.day())
}

/// ## Summary
/// The `week`-th `weekday` of the month, or its last occurrence for
/// `WeekOfMonth::Last`.
///
/// Every month has at least four of each weekday, so the result always lies
/// inside the requested month.
#[must_use]
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    week: WeekOfMonth,
    weekday: Weekday,
) -> Option<NaiveDate> {
    let ordinal = match week {
        WeekOfMonth::First => 1,
        WeekOfMonth::Second => 2,
        WeekOfMonth::Third => 3,
        WeekOfMonth::Fourth => 4,
        WeekOfMonth::Last => {
            let last = NaiveDate::from_ymd_opt(year, month, last_day_of_month(year, month)?)?;
            let back = (7 + last.weekday().num_days_from_sunday()
                - weekday.num_days_from_sunday())
                % 7;
            return last.checked_sub_days(Days::new(u64::from(back)));
        }
    };
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, ordinal)
}
