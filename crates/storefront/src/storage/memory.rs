//! Session storage tier held in process memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use cantera_core::StorageTier;

use super::{StorageBackend, StorageError, validate_key};

/// In-memory key/value map.
///
/// Cloning is cheap and clones share the same map, so a caller can keep a
/// handle to inspect what the cart store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<HashMap<String, String>>>,
    quota_bytes: Option<u64>,
    tier: Option<StorageTier>,
}

impl MemoryStorage {
    /// Unbounded session storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session storage that rejects writes beyond `quota_bytes`.
    #[must_use]
    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Report as the durable tier. Lets tests stand in for [`super::FileStorage`].
    #[must_use]
    pub const fn as_durable(mut self) -> Self {
        self.tier = Some(StorageTier::Durable);
        self
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |map| map.len())
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.inner
            .lock()
            .map_err(|_| StorageError::Unavailable("session storage lock poisoned".to_string()))
    }
}

impl StorageBackend for MemoryStorage {
    fn tier(&self) -> StorageTier {
        self.tier.unwrap_or(StorageTier::Session)
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut map = self.lock()?;

        if let Some(quota) = self.quota_bytes {
            let used: u64 = map
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len() as u64)
                .sum();
            let needed = value.len() as u64;
            let available = quota.saturating_sub(used);
            if needed > available {
                return Err(StorageError::QuotaExceeded { needed, available });
            }
        }

        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        storage.set("cantera_cart", "{}").unwrap();
        assert_eq!(handle.get("cantera_cart").unwrap().as_deref(), Some("{}"));
        assert_eq!(handle.len(), 1);

        handle.remove("cantera_cart").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_quota() {
        let storage = MemoryStorage::with_quota(4);
        storage.set("a", "1234").unwrap();
        assert!(matches!(
            storage.set("b", "1"),
            Err(StorageError::QuotaExceeded {
                needed: 1,
                available: 0
            })
        ));
        // Replacing an existing key only counts the new value
        storage.set("a", "4321").unwrap();
    }

    #[test]
    fn test_tier() {
        assert_eq!(MemoryStorage::new().tier(), StorageTier::Session);
        assert_eq!(
            MemoryStorage::new().as_durable().tier(),
            StorageTier::Durable
        );
    }
}
