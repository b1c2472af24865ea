use thiserror::Error;

/// Errors surfaced by repositories, handlers and the HTTP layer.
///
/// Cache failures are deliberately absent: they are soft and never leave
/// the caching decorator (see `infrastructure::cached_repo`).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("data could not be found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("a required argument was missing")]
    MissingArgument,

    #[error("invalid or missing API key")]
    Unauthorized,

    #[error("the operation timed out")]
    Timeout,

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("document encoding error: {0}")]
    Document(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
