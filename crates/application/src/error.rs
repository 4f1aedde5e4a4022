//! Application error types

use thiserror::Error;

use crate::ports::StoreError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A store operation failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The request description is not usable.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
