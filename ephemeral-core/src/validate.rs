//! Precondition checks shared by the store's operations.

use crate::entry::Entry;
use crate::error::{CacheError, Result};

/// Rejects zero-length keys
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::EmptyKey);
    }
    Ok(())
}

/// Unwraps a possibly-absent value, rejecting `None`
pub fn validate_value<T>(value: Option<T>) -> Result<T> {
    value.ok_or(CacheError::EmptyValue)
}

/// Rejects writes over an immutable entry stored under `key`
pub fn validate_immutable<T>(key: &str, entry: &Entry<T>) -> Result<()> {
    if entry.is_immutable() {
        return Err(CacheError::ImmutableValue(key.to_string()));
    }
    Ok(())
}
