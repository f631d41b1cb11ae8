//! Crate-wide error type.

use thiserror::Error;

/// Errors produced by configuration loading and customer storage.
#[derive(Debug, Error)]
pub enum CustomerError {
    /// Configuration could not be loaded or failed validation
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The storage backend reported a failure; carries the raw driver text
    #[error("database error: {0}")]
    DatabaseError(String),

    /// Anything else that went wrong inside the service
    #[error("server error: {0}")]
    ServerError(String),
}

pub type CustomerResult<T> = Result<T, CustomerError>;
