use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use super::StorageError;

/// A string-keyed, string-valued persistence substrate.
///
/// Implementations use interior mutability so one medium can be shared by
/// several [`Storage`](super::Storage) handles. Per-key atomicity is the
/// medium's business; the wrapper adds no locking of its own.
pub trait Medium: Send + Sync {
    /// Raw text stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Missing keys are not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every key held by the medium.
    fn clear(&self) -> Result<(), StorageError>;

    /// All keys currently held, in the medium's iteration order.
    fn keys(&self) -> Vec<String>;

    /// Whether this medium actually stores anything.
    fn is_available(&self) -> bool {
        true
    }
}

/// Medium used when none is available: reads find nothing, writes vanish.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMedium;

impl Medium for NullMedium {
    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        Vec::new()
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// In-process medium, the session-scoped backend.
///
/// An optional quota caps the total size of keys plus values in bytes.
/// Writes that would exceed it fail with [`StorageError::QuotaExceeded`]
/// and leave the medium unchanged.
#[derive(Debug, Default)]
pub struct MemoryMedium {
    entries: RwLock<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RwLock::default(),
            quota: Some(quota),
        }
    }

    /// Bytes currently used by keys and values.
    pub fn usage(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Medium for MemoryMedium {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(quota) = self.quota {
            let used: usize = entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = used + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_owned(),
                    needed,
                    quota,
                });
            }
        }

        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_medium_basic_ops() {
        let medium = MemoryMedium::new();
        assert!(medium.is_empty());

        medium.set_item("a", "1").unwrap();
        medium.set_item("b", "2").unwrap();
        assert_eq!(medium.get_item("a").as_deref(), Some("1"));
        assert_eq!(medium.keys(), vec!["a", "b"]);

        medium.remove_item("a").unwrap();
        medium.remove_item("a").unwrap();
        assert_eq!(medium.get_item("a"), None);

        medium.clear().unwrap();
        assert!(medium.is_empty());
    }

    #[test]
    fn quota_rejects_oversized_write_and_keeps_old_value() {
        let medium = MemoryMedium::with_quota(8);
        medium.set_item("k", "1234").unwrap();
        assert_eq!(medium.usage(), 5);

        let err = medium.set_item("k", "123456789").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded { needed: 10, quota: 8, .. }
        ));
        assert_eq!(medium.get_item("k").as_deref(), Some("1234"));
    }

    #[test]
    fn quota_counts_replacement_not_addition() {
        let medium = MemoryMedium::with_quota(8);
        medium.set_item("k", "1234567").unwrap();
        medium.set_item("k", "7654321").unwrap();
        assert_eq!(medium.get_item("k").as_deref(), Some("7654321"));
    }

    #[test]
    fn null_medium_is_inert() {
        let medium = NullMedium;
        medium.set_item("k", "v").unwrap();
        assert_eq!(medium.get_item("k"), None);
        assert!(medium.keys().is_empty());
        assert!(!medium.is_available());
    }
}
