//! Recurring-meeting series: configuration, date generation, and the views
//! built on top of it.

pub mod datetime;
pub mod exception;
pub mod model;
pub mod pattern;
pub mod payload;
pub mod plan;
pub mod preview;
pub mod rrule_export;
pub mod series;

pub use exception::{ExceptionSet, is_exception};
pub use model::{
    CustomRule, DayOfMonth, EndKind, MonthlyAnchor, Pattern, PatternKind, RepeatConfig, SeriesEnd,
    WeekOfMonth, WeekdaySet,
};
pub use pattern::next_date;
pub use payload::{PayloadContext, RepeatConfigPayload};
pub use plan::{MeetingSlot, SeriesPlan, plan_payload, plan_series};
pub use preview::{PreviewOptions, SeriesPreview, preview_payload};
pub use rrule_export::{to_rrule, to_rrule_set};
pub use series::{generate_series, generate_series_capped, generate_series_from};
