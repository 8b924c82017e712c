//! Error taxonomy for the view counter.
//!
//! Every variant collapses to a 500 response at the handler boundary;
//! the `Display` text is what the caller sees in the `error` field.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, CounterError>;

#[derive(Debug, Error)]
pub enum CounterError {
    /// The store could not be reached, or refused the request.
    #[error("{0}")]
    Store(String),
    /// The stored record exists but has no usable `views` value.
    #[error("malformed counter record: {0}")]
    MalformedRecord(String),
    #[error("view count overflow")]
    Overflow,
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CounterError {
    pub fn store(err: impl std::fmt::Display) -> Self {
        CounterError::Store(err.to_string())
    }
}
