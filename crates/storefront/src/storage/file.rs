//! Durable storage tier backed by one file per key.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use cantera_core::StorageTier;

use super::{StorageBackend, StorageError, validate_key};

const TEMP_SUFFIX: &str = ".tmp";

/// Files inside a data directory, with a byte quota across all keys.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash never leaves a half-written value behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    quota_bytes: u64,
}

impl FileStorage {
    /// Open (and create if needed) a data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>, quota_bytes: u64) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), quota_bytes, "Opened durable storage");
        Ok(Self { dir, quota_bytes })
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Configured byte quota.
    #[must_use]
    pub const fn quota_bytes(&self) -> u64 {
        self.quota_bytes
    }

    /// Bytes currently used by all keys except `exclude`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn used_bytes(&self, exclude: Option<&str>) -> Result<u64, StorageError> {
        let mut total = 0u64;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.ends_with(TEMP_SUFFIX) || Some(name.as_ref()) == exclude {
                continue;
            }
            let metadata = entry.metadata()?;
            if metadata.is_file() {
                total = total.saturating_add(metadata.len());
            }
        }
        Ok(total)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl StorageBackend for FileStorage {
    fn tier(&self) -> StorageTier {
        StorageTier::Durable
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        let needed = value.len() as u64;
        let used = self.used_bytes(Some(key))?;
        let available = self.quota_bytes.saturating_sub(used);
        if needed > available {
            return Err(StorageError::QuotaExceeded { needed, available });
        }

        let temp = self.dir.join(format!(".{key}{TEMP_SUFFIX}"));
        {
            let mut file = fs::File::create(&temp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp, self.path_for(key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path(), 1024).unwrap();

        assert_eq!(storage.get("cantera_cart").unwrap(), None);
        storage.set("cantera_cart", "{}").unwrap();
        assert_eq!(storage.get("cantera_cart").unwrap().as_deref(), Some("{}"));

        storage.remove("cantera_cart").unwrap();
        assert_eq!(storage.get("cantera_cart").unwrap(), None);
        // Removing again is fine
        storage.remove("cantera_cart").unwrap();
    }

    #[test]
    fn test_quota_counts_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path(), 10).unwrap();

        storage.set("a", "123456").unwrap();
        let err = storage.set("b", "12345").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 5,
                available: 4
            }
        ));
        // The failed write leaves nothing behind
        assert_eq!(storage.get("b").unwrap(), None);
        assert_eq!(storage.used_bytes(None).unwrap(), 6);
    }

    #[test]
    fn test_replacing_key_does_not_count_old_value() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path(), 8).unwrap();

        storage.set("a", "12345678").unwrap();
        storage.set("a", "87654321").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("87654321"));
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileStorage::open(dir.path(), 1024)
            .unwrap()
            .set("cantera_device_id", "abc")
            .unwrap();

        let reopened = FileStorage::open(dir.path(), 1024).unwrap();
        assert_eq!(
            reopened.get("cantera_device_id").unwrap().as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path(), 1024).unwrap();
        assert!(matches!(
            storage.set("../outside", "x"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
