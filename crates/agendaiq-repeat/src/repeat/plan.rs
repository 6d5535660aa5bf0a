//! Expands a series into concrete meeting slots for the meeting-creation flow.

use agendaiq_core::config::RepeatSettings;
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use super::datetime::parse_datetime;
use super::model::RepeatConfig;
use super::payload::{PayloadContext, RepeatConfigPayload};
use super::series::generate_series_capped;
use crate::error::{RepeatError, RepeatResult};

/// One meeting of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingSlot {
    pub index: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// True for the meeting the series was created from.
    pub is_original: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPlan {
    pub slots: Vec<MeetingSlot>,
    pub include_agenda: bool,
}

/// ## Summary
/// Applies the original meeting's duration to every date of the series.
///
/// ## Errors
/// Returns `RepeatError::ValidationError` if `end` precedes `start` or an
/// occurrence end cannot be represented.
pub fn plan_series(
    start: NaiveDateTime,
    end: NaiveDateTime,
    config: &RepeatConfig,
    cap: u32,
) -> RepeatResult<SeriesPlan> {
    let duration: TimeDelta = end.signed_duration_since(start);
    if duration < TimeDelta::zero() {
        return Err(RepeatError::ValidationError(format!(
            "meeting end {end} is before its start {start}"
        )));
    }

    let slots = generate_series_capped(start, config, cap)
        .into_iter()
        .enumerate()
        .map(|(index, slot_start)| -> RepeatResult<MeetingSlot> {
            let slot_end = slot_start.checked_add_signed(duration).ok_or_else(|| {
                RepeatError::ValidationError(format!("meeting starting {slot_start} cannot end"))
            })?;
            Ok(MeetingSlot {
                index,
                start: slot_start,
                end: slot_end,
                is_original: slot_start == start,
            })
        })
        .collect::<RepeatResult<Vec<_>>>()?;

    tracing::debug!(
        slots = slots.len(),
        duration_minutes = duration.num_minutes(),
        "Planned meeting series"
    );

    Ok(SeriesPlan {
        slots,
        include_agenda: config.include_agenda,
    })
}

/// ## Summary
/// Parses wire inputs and plans the series.
///
/// Unlike the preview, a plan feeds meeting creation, so unparseable meeting
/// times are rejected rather than degraded.
///
/// ## Errors
/// Returns `RepeatError::ValidationError` for unparseable start or end times,
/// an invalid payload, or an end before the start.
pub fn plan_payload(
    start: &str,
    end: &str,
    payload: &RepeatConfigPayload,
    settings: &RepeatSettings,
) -> RepeatResult<SeriesPlan> {
    let ctx = PayloadContext::from_settings(settings)?;
    let start_at = parse_datetime(start, ctx.zone)
        .ok_or_else(|| RepeatError::ValidationError(format!("invalid start date {start:?}")))?;
    let end_at = parse_datetime(end, ctx.zone)
        .ok_or_else(|| RepeatError::ValidationError(format!("invalid end date {end:?}")))?;

    if !payload.enabled {
        return plan_single(start_at, end_at, payload.include_agenda);
    }

    let config = payload.to_config(&ctx)?;
    plan_series(start_at, end_at, &config, settings.preview_cap)
}

fn plan_single(
    start: NaiveDateTime,
    end: NaiveDateTime,
    include_agenda: bool,
) -> RepeatResult<SeriesPlan> {
    if end < start {
        return Err(RepeatError::ValidationError(format!(
            "meeting end {end} is before its start {start}"
        )));
    }
    Ok(SeriesPlan {
        slots: vec![MeetingSlot {
            index: 0,
            start,
            end,
            is_original: true,
        }],
        include_agenda,
    })
}
