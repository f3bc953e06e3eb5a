//! Error types for hnews.
//!
//! Only two failures ever reach a caller of the fetch path: a bad story type
//! and a failed upstream listing. Per-item failures are absorbed by the fetcher.

use thiserror::Error;

/// Result type alias using `HnError`.
pub type Result<T> = std::result::Result<T, HnError>;

/// Main error type for all hnews operations.
#[derive(Debug, Error)]
pub enum HnError {
    /// Requested story type is not one of top/show/ask.
    #[error("invalid story type: {0}")]
    InvalidStoryType(String),

    /// Transport, status, or decode failure talking to the upstream API.
    ///
    /// Carries the underlying client error text verbatim; clients see it as is.
    #[error("{0}")]
    Http(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
}

impl HnError {
    /// Returns true if this error came from the upstream API.
    pub fn is_upstream(&self) -> bool {
        matches!(self, HnError::Http(_))
    }

    /// Returns true if this error was caused by caller input.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, HnError::InvalidStoryType(_))
    }
}
