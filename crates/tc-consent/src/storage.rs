//! Key/value storage abstraction
//!
//! Mirrors the browser's `localStorage` / `sessionStorage` surface. The
//! consent store holds one durable and one session-scoped instance.

use parking_lot::Mutex;
use std::collections::HashMap;

/// Storage write failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Storage is full
    #[error("storage quota exceeded writing '{key}'")]
    QuotaExceeded { key: String },

    /// Storage cannot be used at all (disabled, private mode, ...)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String key/value storage
///
/// Implementations use interior mutability so a single durable store can be
/// shared by several consent stores (tabs) at once.
pub trait KeyValueStorage: Send + Sync + std::fmt::Debug {
    /// Read a value
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write a value
    ///
    /// # Errors
    /// Returns [`StorageError`] when the write is refused
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value; absent keys are ignored
    fn remove_item(&self, key: &str);
}

/// In-memory storage
///
/// Optionally enforces a byte quota over keys plus values, like browser
/// storage does.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    /// Create empty unbounded storage
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty storage refusing writes beyond `quota_bytes`
    #[inline]
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Drop every entry (end of a browsing session)
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of stored entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn used_bytes(entries: &HashMap<String, String>) -> usize {
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();

        if let Some(quota) = self.quota_bytes {
            let replaced = entries.get(key).map_or(0, |old| key.len() + old.len());
            let projected = Self::used_bytes(&entries) - replaced + key.len() + value.len();
            if projected > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k"), None);

        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").as_deref(), Some("v"));

        storage.remove_item("k");
        storage.remove_item("missing");
        assert!(storage.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let storage = MemoryStorage::new();
        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();
        assert_eq!(storage.len(), 2);

        storage.clear();
        assert!(storage.is_empty());
    }

    #[test]
    fn quota_counts_replaced_values_once() {
        let storage = MemoryStorage::with_quota(4);
        storage.set_item("k", "abc").unwrap();
        // Replacing "abc" with "xyz" keeps usage at 4 bytes
        storage.set_item("k", "xyz").unwrap();

        let err = storage.set_item("k2", "v").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { ref key } if key == "k2"));
        assert_eq!(storage.get_item("k2"), None);
    }
}
