use salvo::http::StatusCode;
use thiserror::Error;

use agendaiq_repeat::error::RepeatError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    RepeatError(#[from] RepeatError),

    #[error(transparent)]
    CoreError(#[from] agendaiq_core::error::CoreError),
}

impl AppError {
    /// ## Summary
    /// HTTP status that the error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RepeatError(RepeatError::ValidationError(_) | RepeatError::RRuleError(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::RepeatError(RepeatError::CoreError(_)) | Self::CoreError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
