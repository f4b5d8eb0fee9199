//! Shared error model.

use thiserror::Error;

/// Result type used by the pure (non-IO) layers.
pub type CoreResult<T> = Result<T, CoreError>;

/// Deterministic failures: malformed input or identifiers.
///
/// Infrastructure concerns (locks, config, HTTP) have their own error types
/// in the crates that own them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A value failed validation (e.g. an empty todo description).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
