use thiserror::Error;

/// Repeat-engine errors
#[derive(Error, Debug)]
pub enum RepeatError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("RRule error: {0}")]
    RRuleError(#[from] rrule::RRuleError),

    #[error(transparent)]
    CoreError(#[from] agendaiq_core::error::CoreError),
}

pub type RepeatResult<T> = std::result::Result<T, RepeatError>;
