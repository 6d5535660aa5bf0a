//! JSON form of a repeat configuration, as posted by the meeting form.

use std::num::NonZeroU32;

use agendaiq_core::config::RepeatSettings;
use agendaiq_core::constants::{DEFAULT_OCCURRENCES, MAX_OCCURRENCES};
use agendaiq_core::error::CoreError;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::datetime::{format_end_limit, format_iso_date, parse_end_limit};
use super::exception::ExceptionSet;
use super::model::{
    CustomRule, DayOfMonth, EndKind, MonthlyAnchor, Pattern, PatternKind, RepeatConfig, SeriesEnd,
    WeekOfMonth, WeekdaySet, weekday_from_index, weekday_index,
};
use crate::error::{RepeatError, RepeatResult};

/// Flat, mode-tagged configuration bag. Fields that the selected `pattern` or
/// `endType` does not use are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatConfigPayload {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub pattern: PatternKind,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_days: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_week: Option<i8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_week_day: Option<u8>,
    pub end_type: EndKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrences: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default = "default_true")]
    pub include_agenda: bool,
    #[serde(default)]
    pub exceptions: Vec<String>,
}

const fn default_true() -> bool {
    true
}

const fn default_interval() -> u32 {
    1
}

/// Inputs that turn wire strings into typed values.
#[derive(Debug, Clone, Copy)]
pub struct PayloadContext {
    /// Zone that offset-bearing dates are converted into.
    pub zone: Tz,
    /// Used when `endType = after` arrives without `occurrences`.
    pub default_occurrences: NonZeroU32,
    /// Largest accepted `occurrences`.
    pub max_occurrences: u32,
}

impl Default for PayloadContext {
    fn default() -> Self {
        Self {
            zone: chrono_tz::UTC,
            default_occurrences: NonZeroU32::new(DEFAULT_OCCURRENCES).unwrap_or(NonZeroU32::MIN),
            max_occurrences: MAX_OCCURRENCES,
        }
    }
}

impl PayloadContext {
    /// ## Summary
    /// Builds a context from the repeat settings.
    ///
    /// ## Errors
    /// Returns `RepeatError::CoreError` if the settings are unusable. These are
    /// server faults, never a problem with the request.
    pub fn from_settings(settings: &RepeatSettings) -> RepeatResult<Self> {
        settings.validate()?;
        let default_occurrences = NonZeroU32::new(settings.default_occurrences).ok_or_else(|| {
            CoreError::ConfigError("repeat.default_occurrences must be at least 1".to_string())
        })?;
        Ok(Self {
            zone: settings.zone()?,
            default_occurrences,
            max_occurrences: settings.max_occurrences,
        })
    }
}

impl RepeatConfigPayload {
    /// ## Summary
    /// A payload for `pattern` with every optional field unset.
    #[must_use]
    pub fn new(pattern: PatternKind, end_type: EndKind) -> Self {
        Self {
            enabled: true,
            pattern,
            interval: 1,
            week_days: None,
            month_day: None,
            month_week: None,
            month_week_day: None,
            end_type,
            occurrences: None,
            end_date: None,
            include_agenda: true,
            exceptions: Vec::new(),
        }
    }

    /// ## Summary
    /// Converts the payload into a typed configuration.
    ///
    /// Structural fields are validated. Date fields are lenient: an
    /// unparseable `endDate` leaves the series unbounded by date, and
    /// unparseable exceptions are dropped.
    ///
    /// ## Errors
    /// Returns `RepeatError::ValidationError` for a zero interval, an
    /// occurrence count of zero or above `ctx.max_occurrences`, or an
    /// out-of-range `monthDay`, `monthWeek` or weekday index.
    pub fn to_config(&self, ctx: &PayloadContext) -> RepeatResult<RepeatConfig> {
        let pattern = self.resolve_pattern()?;
        let end = self.resolve_end(ctx)?;
        let exceptions = ExceptionSet::parse_lossy(&self.exceptions, ctx.zone);

        Ok(RepeatConfig {
            pattern,
            end,
            include_agenda: self.include_agenda,
            exceptions,
        })
    }

    fn interval(&self) -> RepeatResult<NonZeroU32> {
        NonZeroU32::new(self.interval).ok_or_else(|| {
            RepeatError::ValidationError("interval must be at least 1".to_string())
        })
    }

    fn resolve_pattern(&self) -> RepeatResult<Pattern> {
        Ok(match self.pattern {
            PatternKind::Daily => Pattern::Daily {
                interval: self.interval()?,
            },
            PatternKind::Weekly => Pattern::Weekly,
            PatternKind::Biweekly => Pattern::Biweekly,
            PatternKind::Monthly => Pattern::Monthly(self.resolve_monthly_anchor()?),
            PatternKind::Custom => {
                let days = WeekdaySet::from_indices(self.week_days.as_deref().unwrap_or_default())?;
                if days.is_empty() {
                    Pattern::Custom(CustomRule::EveryNDays(self.interval()?))
                } else {
                    Pattern::Custom(CustomRule::Weekdays(days))
                }
            }
        })
    }

    fn resolve_monthly_anchor(&self) -> RepeatResult<MonthlyAnchor> {
        // A fixed day wins over an Nth-weekday anchor.
        if let Some(day) = self.month_day {
            return Ok(MonthlyAnchor::DayOfMonth(DayOfMonth::new(day)?));
        }
        match (self.month_week, self.month_week_day) {
            (Some(week), Some(weekday)) => Ok(MonthlyAnchor::NthWeekday {
                week: WeekOfMonth::from_wire(week)?,
                weekday: weekday_from_index(weekday)?,
            }),
            _ => Ok(MonthlyAnchor::SameDay),
        }
    }

    fn resolve_end(&self, ctx: &PayloadContext) -> RepeatResult<SeriesEnd> {
        Ok(match self.end_type {
            EndKind::Never => SeriesEnd::Never,
            EndKind::After => {
                let occurrences = match self.occurrences {
                    None => ctx.default_occurrences,
                    Some(count) => NonZeroU32::new(count).ok_or_else(|| {
                        RepeatError::ValidationError("occurrences must be at least 1".to_string())
                    })?,
                };
                if occurrences.get() > ctx.max_occurrences {
                    return Err(RepeatError::ValidationError(format!(
                        "occurrences must be at most {}, got {occurrences}",
                        ctx.max_occurrences
                    )));
                }
                SeriesEnd::After { occurrences }
            }
            EndKind::By => {
                let until = self
                    .end_date
                    .as_deref()
                    .and_then(|raw| {
                        let parsed = parse_end_limit(raw, ctx.zone);
                        if parsed.is_none() {
                            tracing::debug!(end_date = %raw, "Ignoring unparseable end date");
                        }
                        parsed
                    });
                SeriesEnd::By { until }
            }
        })
    }
}

impl TryFrom<&RepeatConfigPayload> for RepeatConfig {
    type Error = RepeatError;

    fn try_from(payload: &RepeatConfigPayload) -> RepeatResult<Self> {
        payload.to_config(&PayloadContext::default())
    }
}

impl From<&RepeatConfig> for RepeatConfigPayload {
    fn from(config: &RepeatConfig) -> Self {
        let mut payload = Self::new(config.pattern.kind(), config.end.kind());
        payload.include_agenda = config.include_agenda;
        payload.exceptions = config.exceptions.iter().map(format_iso_date).collect();

        match config.pattern {
            Pattern::Daily { interval } | Pattern::Custom(CustomRule::EveryNDays(interval)) => {
                payload.interval = interval.get();
            }
            Pattern::Custom(CustomRule::Weekdays(days)) => {
                payload.week_days = Some(days.indices());
            }
            Pattern::Monthly(MonthlyAnchor::DayOfMonth(day)) => {
                payload.month_day = Some(day.get());
            }
            Pattern::Monthly(MonthlyAnchor::NthWeekday { week, weekday }) => {
                payload.month_week = Some(week.to_wire());
                payload.month_week_day = Some(weekday_index(weekday));
            }
            Pattern::Weekly | Pattern::Biweekly | Pattern::Monthly(MonthlyAnchor::SameDay) => {}
        }

        match config.end {
            SeriesEnd::After { occurrences } => payload.occurrences = Some(occurrences.get()),
            SeriesEnd::By { until } => payload.end_date = until.map(format_end_limit),
            SeriesEnd::Never => {}
        }

        payload
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};
    use serde_json::json;

    use super::*;

    fn payload(value: serde_json::Value) -> RepeatConfigPayload {
        serde_json::from_value(value).expect("valid payload json")
    }

    #[test]
    fn minimal_payload_uses_defaults() {
        let p = payload(json!({ "pattern": "weekly", "endType": "after" }));
        assert!(p.enabled);
        assert!(p.include_agenda);
        assert_eq!(p.interval, 1);

        let config = RepeatConfig::try_from(&p).expect("valid config");
        assert_eq!(config.pattern, Pattern::Weekly);
        assert_eq!(
            config.end,
            SeriesEnd::After {
                occurrences: NonZeroU32::new(10).expect("non-zero")
            }
        );
    }

    #[test]
    fn monthly_day_takes_precedence_over_weekday_anchor() {
        let p = payload(json!({
            "pattern": "monthly",
            "monthDay": 31,
            "monthWeek": 2,
            "monthWeekDay": 1,
            "endType": "never"
        }));
        let config = RepeatConfig::try_from(&p).expect("valid config");
        assert_eq!(
            config.pattern,
            Pattern::Monthly(MonthlyAnchor::DayOfMonth(DayOfMonth::new(31).expect("valid")))
        );
    }

    #[test]
    fn monthly_last_weekday_anchor() {
        let p = payload(json!({
            "pattern": "monthly",
            "monthWeek": -1,
            "monthWeekDay": 5,
            "endType": "never"
        }));
        let config = RepeatConfig::try_from(&p).expect("valid config");
        assert_eq!(
            config.pattern,
            Pattern::Monthly(MonthlyAnchor::NthWeekday {
                week: WeekOfMonth::Last,
                weekday: Weekday::Fri
            })
        );
    }

    #[test]
    fn monthly_week_without_weekday_falls_back_to_same_day() {
        let p = payload(json!({ "pattern": "monthly", "monthWeek": 2, "endType": "never" }));
        let config = RepeatConfig::try_from(&p).expect("valid config");
        assert_eq!(config.pattern, Pattern::Monthly(MonthlyAnchor::SameDay));
    }

    #[test]
    fn custom_without_weekdays_uses_interval() {
        let p = payload(json!({
            "pattern": "custom",
            "interval": 3,
            "weekDays": [],
            "endType": "never"
        }));
        let config = RepeatConfig::try_from(&p).expect("valid config");
        assert_eq!(
            config.pattern,
            Pattern::Custom(CustomRule::EveryNDays(NonZeroU32::new(3).expect("non-zero")))
        );
    }

    #[test]
    fn structural_errors_are_rejected() {
        let cases = [
            json!({ "pattern": "daily", "interval": 0, "endType": "never" }),
            json!({ "pattern": "weekly", "endType": "after", "occurrences": 0 }),
            json!({ "pattern": "monthly", "monthDay": 32, "endType": "never" }),
            json!({ "pattern": "monthly", "monthWeek": 5, "monthWeekDay": 1, "endType": "never" }),
            json!({ "pattern": "monthly", "monthWeek": 1, "monthWeekDay": 7, "endType": "never" }),
            json!({ "pattern": "custom", "weekDays": [1, 9], "endType": "never" }),
        ];
        for case in cases {
            let result = RepeatConfig::try_from(&payload(case.clone()));
            assert!(
                matches!(result, Err(RepeatError::ValidationError(_))),
                "expected validation error for {case}"
            );
        }
    }

    #[test]
    fn unused_fields_are_not_validated() {
        let p = payload(json!({
            "pattern": "weekly",
            "interval": 0,
            "monthDay": 99,
            "endType": "never"
        }));
        assert!(RepeatConfig::try_from(&p).is_ok());
    }

    #[test]
    fn unknown_pattern_fails_deserialization() {
        let result: Result<RepeatConfigPayload, _> =
            serde_json::from_value(json!({ "pattern": "yearly", "endType": "never" }));
        assert!(result.is_err());
    }

    #[test]
    fn lenient_dates_degrade() {
        let p = payload(json!({
            "pattern": "weekly",
            "endType": "by",
            "endDate": "whenever",
            "exceptions": ["2024-01-08", "bad"]
        }));
        let config = RepeatConfig::try_from(&p).expect("valid config");
        assert_eq!(config.end, SeriesEnd::By { until: None });
        assert_eq!(config.exceptions.len(), 1);
    }

    #[test]
    fn context_zone_applies_to_dates() {
        let ctx = PayloadContext {
            zone: chrono_tz::Asia::Tokyo,
            ..PayloadContext::default()
        };
        let p = payload(json!({
            "pattern": "weekly",
            "endType": "never",
            "exceptions": ["2024-01-07T20:00:00Z"]
        }));
        let config = p.to_config(&ctx).expect("valid config");
        // 20:00Z on the 7th is the morning of the 8th in Tokyo.
        assert_eq!(
            config.exceptions.iter().collect::<Vec<_>>(),
            vec![NaiveDate::from_ymd_opt(2024, 1, 8).expect("valid date")]
        );
    }

    #[test]
    fn typed_config_serializes_back_to_wire() {
        let p = payload(json!({
            "pattern": "custom",
            "weekDays": [5, 1, 3],
            "endType": "by",
            "endDate": "2024-06-30",
            "includeAgenda": false,
            "exceptions": ["2024-05-27"]
        }));
        let config = RepeatConfig::try_from(&p).expect("valid config");
        let back = serde_json::to_value(RepeatConfigPayload::from(&config)).expect("serializes");
        assert_eq!(
            back,
            json!({
                "enabled": true,
                "pattern": "custom",
                "interval": 1,
                "weekDays": [1, 3, 5],
                "endType": "by",
                "endDate": "2024-06-30",
                "includeAgenda": false,
                "exceptions": ["2024-05-27"]
            })
        );
    }

    #[test]
    fn context_from_settings() {
        let settings = RepeatSettings {
            timezone: "Europe/Berlin".to_string(),
            default_occurrences: 4,
            ..RepeatSettings::default()
        };
        let ctx = PayloadContext::from_settings(&settings).expect("valid settings");
        assert_eq!(ctx.zone, chrono_tz::Europe::Berlin);
        assert_eq!(ctx.default_occurrences.get(), 4);

        let zero = RepeatSettings {
            default_occurrences: 0,
            ..RepeatSettings::default()
        };
        assert!(matches!(
            PayloadContext::from_settings(&zero),
            Err(RepeatError::CoreError(CoreError::ConfigError(_)))
        ));
    }

    #[test]
    fn occurrences_above_maximum_are_rejected() {
        let ctx = PayloadContext {
            max_occurrences: 365,
            ..PayloadContext::default()
        };
        let at_limit = payload(json!({ "pattern": "daily", "endType": "after", "occurrences": 365 }));
        assert!(at_limit.to_config(&ctx).is_ok());

        for count in [366, 20_000_000, u32::MAX] {
            let p = payload(json!({ "pattern": "daily", "endType": "after", "occurrences": count }));
            assert!(
                matches!(p.to_config(&ctx), Err(RepeatError::ValidationError(_))),
                "expected {count} to be rejected"
            );
        }
    }
}
