//! Error types for the memoizer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Memo Error Enum ==
/// Unified error type for the memoizer and its collaborators.
#[derive(Error, Debug)]
pub enum MemoError {
    /// The cache backend does not provide the requested capability
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Arguments could not be serialized into a cache key
    #[error("Failed to build cache key: {0}")]
    KeyBuild(#[from] serde_json::Error),

    /// Interval without positive width
    #[error("Invalid interval: start {start} must be less than end {end}")]
    InvalidInterval { start: i64, end: i64 },

    /// Malformed configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

// == Result Type Alias ==
/// Convenience Result type for the memoizer.
pub type Result<T> = std::result::Result<T, MemoError>;
