//! Key/value storage tiers used for cart persistence.
//!
//! Two tiers exist:
//! - [`FileStorage`] - durable, survives restarts, subject to a byte quota
//! - [`MemoryStorage`] - session-scoped, lives as long as the process
//!
//! Both implement [`StorageBackend`] so the cart store can route writes to
//! either one.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use cantera_core::StorageTier;
use thiserror::Error;

/// Errors that can occur reading or writing a storage tier.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing would exceed the tier's byte quota.
    #[error("Storage quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: u64, available: u64 },

    /// Underlying I/O failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tier cannot be used at all.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The key cannot be stored by this tier.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string key/value store.
pub trait StorageBackend: Send + Sync {
    /// Which tier this backend represents.
    fn tier(&self) -> StorageTier;

    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the tier cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::QuotaExceeded` if the value does not fit.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the tier cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Keys are used as file names by the durable tier, so keep them boring.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("cantera_cart").is_ok());
        assert!(validate_key("cart-v3.backup").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("a/b").is_err());
    }
}
