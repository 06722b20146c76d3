use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use super::{Medium, StorageError};

/// Disk-backed medium, the persistent-scoped backend.
///
/// Entries live in memory and are written out as a single JSON object after
/// every mutation. The file is replaced through a temporary sibling and a
/// rename. If writing fails, the in-memory entries are left as they were.
#[derive(Debug)]
pub struct FileMedium {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileMedium {
    /// Open the medium at `path`, loading existing entries.
    ///
    /// A missing or empty file starts an empty medium; the file is created
    /// on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|source| StorageError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "opened file medium");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate<F>(&self, f: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        f(&mut next);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let text = serde_json::to_vec_pretty(entries).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let tmp = temp_path(&self.path);
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            io_err(source)
        })
    }
}

/// Sibling of `path` named after its full file name, so `local.json` and
/// `local.db` never share a temporary file.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

impl Medium for FileMedium {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.mutate(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.get_item(key).is_none() {
            return Ok(());
        }
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.mutate(BTreeMap::clear)
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
    fn temp_file_keeps_full_name() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("local.json");
        let db = dir.path().join("local.db");

        assert_eq!(temp_path(&json), dir.path().join("local.json.tmp"));
        assert_ne!(temp_path(&json), temp_path(&db));

        let medium = FileMedium::open(&json).unwrap();
        medium.set_item("k", "1").unwrap();
        assert!(json.exists());
        assert!(!temp_path(&json).exists());
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        let medium = FileMedium::open(&path).unwrap();
        // A directory in the way makes the rename fail after the write succeeds.
        fs::create_dir(&path).unwrap();

        let err = medium.set_item("k", "1").unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
        assert!(!temp_path(&path).exists());
        assert_eq!(medium.get_item("k"), None);
    }

    #[test]
    fn entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");

        let medium = FileMedium::open(&path).unwrap();
        medium.set_item("theme", "\"dark\"").unwrap();
        medium.set_item("count", "3").unwrap();
        medium.remove_item("count").unwrap();
        drop(medium);

        let reopened = FileMedium::open(&path).unwrap();
        assert_eq!(reopened.get_item("theme").as_deref(), Some("\"dark\""));
        assert_eq!(reopened.get_item("count"), None);
        assert_eq!(reopened.keys(), vec!["theme"]);
    }

    #[test]
    fn missing_file_starts_empty_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let medium = FileMedium::open(&path).unwrap();
        assert!(medium.keys().is_empty());
        assert!(!path.exists());

        medium.set_item("k", "1").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn clear_empties_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");

        let medium = FileMedium::open(&path).unwrap();
        medium.set_item("k", "1").unwrap();
        medium.clear().unwrap();

        let reopened = FileMedium::open(&path).unwrap();
        assert!(reopened.keys().is_empty());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileMedium::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}
