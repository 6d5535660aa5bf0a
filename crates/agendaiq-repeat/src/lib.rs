//! Recurring-meeting series engine.
//!
//! Turns a repeat configuration and a meeting start into the ordered list of
//! concrete meeting dates, and renders the preview, slot plan, and RRULE forms
//! that the meeting workflow consumes.

pub mod error;
pub mod repeat;
