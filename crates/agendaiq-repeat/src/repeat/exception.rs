//! Exception dates (holidays and other skipped days) for a series.

use std::collections::BTreeSet;
use std::collections::btree_set;
use std::iter::Copied;

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use super::datetime::parse_date;

/// Calendar days suppressed from a series. Time-of-day is never compared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionSet {
    days: BTreeSet<NaiveDate>,
}

impl ExceptionSet {
    /// ## Summary
    /// Parses exception strings, dropping any that are not valid dates.
    #[must_use]
    pub fn parse_lossy<S: AsRef<str>>(values: &[S], zone: Tz) -> Self {
        let days = values
            .iter()
            .filter_map(|value| {
                let value = value.as_ref();
                let parsed = parse_date(value, zone);
                if parsed.is_none() {
                    tracing::debug!(exception = %value, "Ignoring unparseable exception date");
                }
                parsed
            })
            .collect();
        Self { days }
    }

    /// True if `date` falls on one of the excluded calendar days.
    #[must_use]
    pub fn contains(&self, date: NaiveDateTime) -> bool {
        self.days.contains(&date.date())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Excluded days in ascending order.
    pub fn iter(&self) -> Copied<btree_set::Iter<'_, NaiveDate>> {
        self.days.iter().copied()
    }
}

impl<'a> IntoIterator for &'a ExceptionSet {
    type Item = NaiveDate;
    type IntoIter = Copied<btree_set::Iter<'a, NaiveDate>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<NaiveDate> for ExceptionSet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

/// ## Summary
/// Returns true if `date` is calendar-day-equal to any entry of `exceptions`.
///
/// Unparseable entries never match.
#[must_use]
pub fn is_exception<S: AsRef<str>>(date: NaiveDateTime, exceptions: &[S], zone: Tz) -> bool {
    exceptions
        .iter()
        .filter_map(|value| parse_date(value.as_ref(), zone))
        .any(|day| day == date.date())
}
