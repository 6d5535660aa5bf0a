use thiserror::Error;

/// Errors raised while loading settings or reading request-scoped state.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// State the router was expected to inject is absent.
    #[error("Missing request state: {0}")]
    MissingState(&'static str),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
