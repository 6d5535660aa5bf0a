//! Typed repeat configuration.
//!
//! Each pattern variant carries only the fields it uses, so the resolver never
//! has to ask whether an optional field happens to be set.

use std::fmt;
use std::num::NonZeroU32;

use chrono::{NaiveDateTime, Weekday};

use super::exception::ExceptionSet;
use crate::error::{RepeatError, RepeatResult};

/// A complete recurring-series definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatConfig {
    pub pattern: Pattern,
    pub end: SeriesEnd,
    /// Whether every meeting in the series receives a copy of the agenda.
    pub include_agenda: bool,
    pub exceptions: ExceptionSet,
}

impl RepeatConfig {
    /// ## Summary
    /// Creates a configuration with no exceptions that copies the agenda.
    #[must_use]
    pub fn new(pattern: Pattern, end: SeriesEnd) -> Self {
        Self {
            pattern,
            end,
            include_agenda: true,
            exceptions: ExceptionSet::default(),
        }
    }

    #[must_use]
    pub fn with_exceptions(mut self, exceptions: ExceptionSet) -> Self {
        self.exceptions = exceptions;
        self
    }

    #[must_use]
    pub fn with_include_agenda(mut self, include_agenda: bool) -> Self {
        self.include_agenda = include_agenda;
        self
    }
}

/// Recurrence rule family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Every `interval` days.
    Daily { interval: NonZeroU32 },
    Weekly,
    Biweekly,
    Monthly(MonthlyAnchor),
    Custom(CustomRule),
}

impl Pattern {
    #[must_use]
    pub const fn kind(self) -> PatternKind {
        match self {
            Self::Daily { .. } => PatternKind::Daily,
            Self::Weekly => PatternKind::Weekly,
            Self::Biweekly => PatternKind::Biweekly,
            Self::Monthly(_) => PatternKind::Monthly,
            Self::Custom(_) => PatternKind::Custom,
        }
    }
}

/// The pattern tag as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Custom,
}

impl PatternKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a monthly series picks its day in the following month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyAnchor {
    /// Same day-of-month as the current occurrence.
    SameDay,
    /// Fixed day-of-month, clamped to the length of the target month.
    DayOfMonth(DayOfMonth),
    /// "Second Tuesday", "last Friday", ...
    NthWeekday { week: WeekOfMonth, weekday: Weekday },
}

/// Day-of-month in `1..=31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DayOfMonth(u32);

impl DayOfMonth {
    /// ## Summary
    /// Wraps a day-of-month.
    ///
    /// ## Errors
    /// Returns `RepeatError::ValidationError` outside `1..=31`.
    pub fn new(day: u32) -> RepeatResult<Self> {
        if (1..=31).contains(&day) {
            Ok(Self(day))
        } else {
            Err(RepeatError::ValidationError(format!(
                "monthDay must be between 1 and 31, got {day}"
            )))
        }
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Ordinal week within a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekOfMonth {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekOfMonth {
    /// ## Summary
    /// Maps the wire encoding (`1..=4`, `-1` for last).
    ///
    /// ## Errors
    /// Returns `RepeatError::ValidationError` for any other value.
    pub fn from_wire(value: i8) -> RepeatResult<Self> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            3 => Ok(Self::Third),
            4 => Ok(Self::Fourth),
            -1 => Ok(Self::Last),
            other => Err(RepeatError::ValidationError(format!(
                "monthWeek must be 1-4 or -1, got {other}"
            ))),
        }
    }

    #[must_use]
    pub const fn to_wire(self) -> i8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
            Self::Last => -1,
        }
    }
}

/// Rule for the `custom` pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomRule {
    /// Next day whose weekday is in the set.
    Weekdays(WeekdaySet),
    /// Every `n` days.
    EveryNDays(NonZeroU32),
}

/// Set of weekdays, indexed Sunday = 0 through Saturday = 6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// ## Summary
    /// Builds a set from wire indices (0 = Sunday .. 6 = Saturday).
    ///
    /// ## Errors
    /// Returns `RepeatError::ValidationError` if any index is above 6.
    pub fn from_indices(indices: &[u8]) -> RepeatResult<Self> {
        indices.iter().try_fold(Self::default(), |set, &index| {
            weekday_from_index(index).map(|day| set.with(day))
        })
    }

    #[must_use]
    pub fn with(self, day: Weekday) -> Self {
        Self(self.0 | (1 << day.num_days_from_sunday()))
    }

    #[must_use]
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_sunday()) != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in Sunday-first order.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        (0..7u8)
            .filter_map(|index| weekday_from_index(index).ok())
            .filter(move |day| self.contains(*day))
    }

    /// Wire indices in ascending order.
    #[must_use]
    pub fn indices(self) -> Vec<u8> {
        self.iter().map(weekday_index).collect()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), Self::with)
    }
}

/// Stop condition for a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesEnd {
    /// Open-ended; previews stop at the cap.
    Never,
    /// Stop after this many loop iterations.
    After { occurrences: NonZeroU32 },
    /// Stop once an occurrence would pass `until`.
    ///
    /// `None` when the supplied end date did not parse; the series is then
    /// bounded only by the preview cap.
    By { until: Option<NaiveDateTime> },
}

/// The end tag as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndKind {
    Never,
    After,
    By,
}

impl SeriesEnd {
    #[must_use]
    pub const fn kind(&self) -> EndKind {
        match self {
            Self::Never => EndKind::Never,
            Self::After { .. } => EndKind::After,
            Self::By { .. } => EndKind::By,
        }
    }
}

/// ## Summary
/// Maps a wire weekday index (0 = Sunday) to a `Weekday`.
///
/// ## Errors
/// Returns `RepeatError::ValidationError` if the index is above 6.
pub fn weekday_from_index(index: u8) -> RepeatResult<Weekday> {
    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(RepeatError::ValidationError(format!(
            "weekday index must be 0-6, got {other}"
        ))),
    }
}

/// Wire weekday index (0 = Sunday) of a `Weekday`.
#[must_use]
pub fn weekday_index(day: Weekday) -> u8 {
    match day {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}
