//! Error types for store operations.

use thiserror::Error;

/// Errors returned by [`Store`](crate::Store) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The operation was called with a zero-length key
    #[error("key is empty")]
    EmptyKey,

    /// A write was attempted with an absent value
    #[error("value is empty")]
    EmptyValue,

    /// The key is absent, or was expired and has just been evicted
    #[error("key not found, key = {0:?}")]
    KeyNotFound(String),

    /// The key holds an immutable entry and cannot be overwritten
    #[error("value is immutable, key = {0:?}")]
    ImmutableValue(String),
}

impl CacheError {
    /// Returns `true` if this error reports a missing or expired key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::KeyNotFound(_))
    }

    /// Returns `true` if this error reports a write to an immutable key.
    pub fn is_immutable(&self) -> bool {
        matches!(self, CacheError::ImmutableValue(_))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
