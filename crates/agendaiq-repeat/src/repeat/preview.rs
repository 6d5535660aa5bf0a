//! Preview of a series as shown in the repeat-meeting dialog.

use agendaiq_core::config::RepeatSettings;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::datetime::{format_long_date, parse_datetime};
use super::model::{RepeatConfig, SeriesEnd};
use super::payload::{PayloadContext, RepeatConfigPayload};
use super::series::generate_series_capped;
use crate::error::RepeatResult;

const UNKNOWN_DATE: &str = "selected date";
pub const NO_MEETINGS: &str = "No meetings scheduled";
pub const CONTINUES_INDEFINITELY: &str = "Series continues indefinitely...";

/// Length limits for a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Iteration cap for `never` and `by` series.
    pub cap: u32,
    /// Dates listed before the rest is summarised.
    pub shown: usize,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self::from(&RepeatSettings::default())
    }
}

impl From<&RepeatSettings> for PreviewOptions {
    fn from(settings: &RepeatSettings) -> Self {
        Self {
            cap: settings.preview_cap,
            shown: settings.preview_shown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPreview {
    /// First `shown` dates of the series. The start date is absent when it
    /// falls on an exception.
    pub dates: Vec<NaiveDateTime>,
    /// Number of dates the series materialized to.
    pub total: usize,
    /// Meetings beyond the listed ones for an `after` series.
    pub remaining: u32,
    pub continues_indefinitely: bool,
    /// "This will create 10 meetings starting from Jan 01, 2024. ..."
    pub summary: String,
    /// "Repeats weekly (10 times)"
    pub label: String,
    /// Footer lines under the date list.
    pub notes: Vec<String>,
}

impl SeriesPreview {
    /// ## Summary
    /// Builds the preview for a start date and configuration.
    ///
    /// A missing start yields an empty date list but still renders the
    /// summary with a placeholder date.
    #[must_use]
    pub fn build(start: Option<NaiveDateTime>, config: &RepeatConfig, options: PreviewOptions) -> Self {
        let series = start
            .map(|start| generate_series_capped(start, config, options.cap))
            .unwrap_or_default();

        let remaining = match config.end {
            SeriesEnd::After { occurrences } => {
                let shown = u32::try_from(options.shown).unwrap_or(u32::MAX);
                occurrences.get().saturating_sub(shown)
            }
            SeriesEnd::Never | SeriesEnd::By { .. } => 0,
        };
        let continues_indefinitely = matches!(config.end, SeriesEnd::Never);

        let mut notes = Vec::new();
        if series.is_empty() {
            notes.push(NO_MEETINGS.to_string());
        }
        if continues_indefinitely {
            notes.push(CONTINUES_INDEFINITELY.to_string());
        }
        if remaining > 0 {
            notes.push(format!("...and {remaining} more meetings"));
        }

        Self {
            total: series.len(),
            dates: series.into_iter().take(options.shown).collect(),
            remaining,
            continues_indefinitely,
            summary: summary(start.map(|dt| dt.date()), config),
            label: label(config),
            notes,
        }
    }

    /// ## Summary
    /// The preview of a disabled repeat configuration: nothing is scheduled.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            dates: Vec::new(),
            total: 0,
            remaining: 0,
            continues_indefinitely: false,
            summary: String::new(),
            label: String::new(),
            notes: vec![NO_MEETINGS.to_string()],
        }
    }
}

/// ## Summary
/// Parses a wire payload and start string and builds its preview.
///
/// ## Errors
/// Returns `RepeatError::ValidationError` if the payload fails structural
/// validation. Malformed dates never error.
pub fn preview_payload(
    start: Option<&str>,
    payload: &RepeatConfigPayload,
    settings: &RepeatSettings,
) -> RepeatResult<SeriesPreview> {
    if !payload.enabled {
        return Ok(SeriesPreview::disabled());
    }
    let ctx = PayloadContext::from_settings(settings)?;
    let config = payload.to_config(&ctx)?;
    let start = start.and_then(|raw| {
        let parsed = parse_datetime(raw, ctx.zone);
        if parsed.is_none() {
            tracing::debug!(start = %raw, "Invalid start date, preview is empty");
        }
        parsed
    });
    Ok(SeriesPreview::build(start, &config, PreviewOptions::from(settings)))
}

fn long_or_placeholder(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| UNKNOWN_DATE.to_string(), format_long_date)
}

/// ## Summary
/// The confirmation sentence shown before a series is created.
#[must_use]
pub fn summary(start: Option<NaiveDate>, config: &RepeatConfig) -> String {
    let extent = match config.end {
        SeriesEnd::Never => "an ongoing series".to_string(),
        SeriesEnd::After { occurrences } => format!("{occurrences} meetings"),
        SeriesEnd::By { until } => {
            format!("meetings until {}", long_or_placeholder(until.map(|dt| dt.date())))
        }
    };
    let agenda = if config.include_agenda {
        "All meetings will have the same agenda."
    } else {
        "Each meeting will have an empty agenda."
    };
    format!(
        "This will create {extent} starting from {}. {agenda}",
        long_or_placeholder(start)
    )
}

/// ## Summary
/// Short description for the repeat button, e.g. "Repeats monthly until Jun 30, 2024".
#[must_use]
pub fn label(config: &RepeatConfig) -> String {
    let pattern = config.pattern.kind();
    match config.end {
        SeriesEnd::After { occurrences } => format!("Repeats {pattern} ({occurrences} times)"),
        SeriesEnd::By { until: Some(until) } => {
            format!("Repeats {pattern} until {}", format_long_date(until.date()))
        }
        SeriesEnd::By { until: None } | SeriesEnd::Never => format!("Repeats {pattern}"),
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::repeat::exception::ExceptionSet;
    use crate::repeat::model::{EndKind, Pattern, PatternKind};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(15, 0, 0))
            .expect("valid date")
    }

    fn after(n: u32) -> SeriesEnd {
        SeriesEnd::After {
            occurrences: NonZeroU32::new(n).expect("non-zero"),
        }
    }

    #[test]
    fn after_series_lists_first_ten_and_counts_rest() {
        let config = RepeatConfig::new(Pattern::Weekly, after(15));
        let preview = SeriesPreview::build(Some(at(2024, 1, 1)), &config, PreviewOptions::default());
        assert_eq!(preview.dates.len(), 10);
        assert_eq!(preview.total, 15);
        assert_eq!(preview.remaining, 5);
        assert_eq!(preview.notes, vec!["...and 5 more meetings".to_string()]);
        assert_eq!(
            preview.summary,
            "This will create 15 meetings starting from Jan 01, 2024. All meetings will have the same agenda."
        );
        assert_eq!(preview.label, "Repeats weekly (15 times)");
    }

    #[test]
    fn excepted_start_is_not_listed() {
        let exceptions: ExceptionSet = [at(2024, 1, 1).date()].into_iter().collect();
        let config = RepeatConfig::new(Pattern::Weekly, after(3)).with_exceptions(exceptions);
        let preview = SeriesPreview::build(Some(at(2024, 1, 1)), &config, PreviewOptions::default());
        assert_eq!(preview.dates, vec![at(2024, 1, 8), at(2024, 1, 15)]);
        assert_eq!(preview.total, 2);
        assert!(preview.summary.contains("starting from Jan 01, 2024"));
    }

    #[test]
    fn never_series_notes_indefinite() {
        let config =
            RepeatConfig::new(Pattern::Biweekly, SeriesEnd::Never).with_include_agenda(false);
        let preview = SeriesPreview::build(Some(at(2024, 1, 1)), &config, PreviewOptions::default());
        assert_eq!(preview.total, 52);
        assert!(preview.continues_indefinitely);
        assert_eq!(preview.remaining, 0);
        assert_eq!(preview.notes, vec![CONTINUES_INDEFINITELY.to_string()]);
        assert_eq!(
            preview.summary,
            "This will create an ongoing series starting from Jan 01, 2024. Each meeting will have an empty agenda."
        );
        assert_eq!(preview.label, "Repeats biweekly");
    }

    #[test]
    fn by_series_summary_uses_end_date() {
        let config = RepeatConfig::new(
            Pattern::Weekly,
            SeriesEnd::By {
                until: Some(at(2024, 3, 1)),
            },
        );
        assert_eq!(
            summary(Some(at(2024, 1, 1).date()), &config),
            "This will create meetings until Mar 01, 2024 starting from Jan 01, 2024. All meetings will have the same agenda."
        );
        assert_eq!(label(&config), "Repeats weekly until Mar 01, 2024");
    }

    #[test]
    fn unknown_dates_use_placeholder() {
        let config = RepeatConfig::new(Pattern::Weekly, SeriesEnd::By { until: None });
        let preview = SeriesPreview::build(None, &config, PreviewOptions::default());
        assert!(preview.dates.is_empty());
        assert_eq!(preview.notes, vec![NO_MEETINGS.to_string()]);
        assert_eq!(
            preview.summary,
            "This will create meetings until selected date starting from selected date. All meetings will have the same agenda."
        );
        assert_eq!(preview.label, "Repeats weekly");
    }

    #[test]
    fn disabled_payload_schedules_nothing() {
        let mut payload = RepeatConfigPayload::new(PatternKind::Daily, EndKind::Never);
        payload.enabled = false;
        let preview = preview_payload(Some("2024-01-01"), &payload, &RepeatSettings::default())
            .expect("disabled preview");
        assert_eq!(preview, SeriesPreview::disabled());
    }

    #[test]
    fn payload_preview_honours_settings() {
        let payload = RepeatConfigPayload::new(PatternKind::Daily, EndKind::Never);
        let settings = RepeatSettings {
            preview_cap: 5,
            preview_shown: 3,
            ..RepeatSettings::default()
        };
        let preview =
            preview_payload(Some("2024-01-01T15:00:00"), &payload, &settings).expect("preview");
        assert_eq!(preview.total, 5);
        assert_eq!(preview.dates, vec![at(2024, 1, 1), at(2024, 1, 2), at(2024, 1, 3)]);
    }

    #[test]
    fn payload_preview_with_bad_start_is_empty() {
        let payload = RepeatConfigPayload::new(PatternKind::Weekly, EndKind::After);
        let preview =
            preview_payload(Some("soon"), &payload, &RepeatSettings::default()).expect("preview");
        assert!(preview.dates.is_empty());
        assert_eq!(preview.remaining, 0);
        assert!(preview.summary.contains("starting from selected date"));
    }
}
