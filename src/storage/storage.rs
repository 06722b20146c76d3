use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{MemoryMedium, Medium, NullMedium, StorageError};

/// Which kind of medium a [`Storage`] is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageScope {
    /// Survives the session (browser `localStorage`, a file on disk).
    Local,
    /// Lives for one session (browser `sessionStorage`, process memory).
    Session,
}

impl StorageScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Session => "session",
        }
    }
}

impl fmt::Display for StorageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON-serializing adapter over a [`Medium`].
///
/// The plain methods never fail: serialization and medium errors are logged
/// through `tracing` and resolved to the caller's fallback (or to a no-op for
/// writes). The `try_*` methods return the underlying [`StorageError`].
///
/// The wrapper holds no state of its own. Cloning it shares the medium.
///
/// # Examples
///
/// ```
/// use satchel::storage::{Storage, StorageScope};
///
/// let storage = Storage::in_memory(StorageScope::Session);
/// storage.set("user", &serde_json::json!({ "name": "ada", "admin": true }));
///
/// let user: serde_json::Value = storage.get("user", serde_json::Value::Null);
/// assert_eq!(user["name"], "ada");
/// assert_eq!(storage.get("missing", 5), 5);
/// ```
#[derive(Clone)]
pub struct Storage {
    medium: Arc<dyn Medium>,
    scope: StorageScope,
}

impl Storage {
    pub fn new(medium: Arc<dyn Medium>, scope: StorageScope) -> Self {
        Self { medium, scope }
    }

    /// Bind to `medium` if the host provides one, otherwise to an inert
    /// medium that stores nothing.
    pub fn from_medium(medium: Option<Arc<dyn Medium>>, scope: StorageScope) -> Self {
        match medium {
            Some(medium) => Self::new(medium, scope),
            None => {
                tracing::warn!(%scope, "storage medium unavailable; falling back to inert storage");
                Self::unavailable(scope)
            }
        }
    }

    /// Storage whose reads always miss and whose writes are dropped.
    pub fn unavailable(scope: StorageScope) -> Self {
        Self::new(Arc::new(NullMedium), scope)
    }

    pub fn in_memory(scope: StorageScope) -> Self {
        Self::new(Arc::new(MemoryMedium::new()), scope)
    }

    pub fn scope(&self) -> StorageScope {
        self.scope
    }

    pub fn is_available(&self) -> bool {
        self.medium.is_available()
    }

    /// Serialize `value` and store it under `key`.
    ///
    /// On failure the medium is left unchanged for `key`.
    pub fn try_set<T>(&self, key: &str, value: &T) -> Result<(), StorageError>
    where
        T: Serialize + ?Sized,
    {
        let text = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
            key: key.to_owned(),
            source,
        })?;
        self.medium.set_item(key, &text)
    }

    /// Read and deserialize the value under `key`.
    ///
    /// A missing key and an empty stored string both yield `Ok(None)`.
    pub fn try_get<T>(&self, key: &str) -> Result<Option<T>, StorageError>
    where
        T: DeserializeOwned,
    {
        match self.medium.get_item(key) {
            Some(text) if !text.is_empty() => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| StorageError::Deserialization {
                    key: key.to_owned(),
                    source,
                }),
            _ => Ok(None),
        }
    }

    pub fn set<T>(&self, key: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        if let Err(err) = self.try_set(key, value) {
            self.report("set", &err);
        }
    }

    /// Value under `key`, or `fallback` if it is missing or unreadable.
    pub fn get<T>(&self, key: &str, fallback: T) -> T
    where
        T: DeserializeOwned,
    {
        self.get_opt(key).unwrap_or(fallback)
    }

    /// Like [`Storage::get`], computing the fallback only when needed.
    pub fn get_or_else<T, F>(&self, key: &str, fallback: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        self.get_opt(key).unwrap_or_else(fallback)
    }

    pub fn get_opt<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        self.try_get(key).unwrap_or_else(|err| {
            self.report("get", &err);
            None
        })
    }

    pub fn remove(&self, key: &str) {
        if let Err(err) = self.medium.remove_item(key) {
            self.report("remove", &err);
        }
    }

    /// Remove every key in the medium, including keys written by others
    /// sharing it.
    pub fn clear(&self) {
        if let Err(err) = self.medium.clear() {
            self.report("clear", &err);
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.medium.keys()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.medium
            .get_item(key)
            .is_some_and(|text| !text.is_empty())
    }

    fn report(&self, operation: &'static str, err: &StorageError) {
        tracing::error!(
            scope = %self.scope,
            operation,
            key = err.key().unwrap_or_default(),
            error = %err,
            "storage operation failed"
        );
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("scope", &self.scope)
            .field("available", &self.is_available())
            .finish()
    }
}

/// A persistent-scoped and a session-scoped [`Storage`], sharing nothing.
#[derive(Debug, Clone)]
pub struct BrowserStorage {
    pub local: Storage,
    pub session: Storage,
}

impl BrowserStorage {
    pub fn new(local: Arc<dyn Medium>, session: Arc<dyn Medium>) -> Self {
        Self {
            local: Storage::new(local, StorageScope::Local),
            session: Storage::new(session, StorageScope::Session),
        }
    }

    /// Two separate in-memory media.
    pub fn in_memory() -> Self {
        Self {
            local: Storage::in_memory(StorageScope::Local),
            session: Storage::in_memory(StorageScope::Session),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            local: Storage::unavailable(StorageScope::Local),
            session: Storage::unavailable(StorageScope::Session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::{Deserialize, Serializer};
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        theme: String,
        font_size: u8,
        tags: Vec<String>,
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refuses to serialize"))
        }
    }

    fn memory_storage() -> (Arc<MemoryMedium>, Storage) {
        let medium = Arc::new(MemoryMedium::new());
        let storage = Storage::new(medium.clone(), StorageScope::Local);
        (medium, storage)
    }

    #[test]
    fn set_writes_json_text() {
        let (medium, storage) = memory_storage();
        storage.set("key", &serde_json::json!({ "a": 1 }));

        assert_eq!(medium.get_item("key").as_deref(), Some(r#"{"a":1}"#));
        let value: serde_json::Value = storage.get("key", serde_json::Value::Null);
        assert_eq!(value, serde_json::json!({ "a": 1 }));
    }

    #[test]
    fn structs_round_trip() {
        let (_, storage) = memory_storage();
        let prefs = Prefs {
            theme: "dark".into(),
            font_size: 14,
            tags: vec!["a".into(), "b".into()],
        };

        storage.set("prefs", &prefs);
        assert_eq!(storage.get_opt::<Prefs>("prefs"), Some(prefs));
    }

    #[test]
    fn missing_key_returns_fallback() {
        let (_, storage) = memory_storage();
        assert_eq!(storage.get("missing", String::from("default")), "default");
        assert_eq!(storage.get_or_else("missing", || 9), 9);
        assert_eq!(storage.get_opt::<i32>("missing"), None);
    }

    #[test]
    fn removed_key_returns_fallback() {
        let (_, storage) = memory_storage();
        storage.set("n", &1);
        storage.remove("n");
        storage.remove("n");
        assert_eq!(storage.get("n", 0), 0);
        assert!(!storage.contains("n"));
    }

    #[test]
    fn empty_stored_text_counts_as_missing() {
        let (medium, storage) = memory_storage();
        medium.set_item("blank", "").unwrap();
        assert!(matches!(storage.try_get::<i32>("blank"), Ok(None)));
        assert_eq!(storage.get("blank", 4), 4);
        assert!(!storage.contains("blank"));
    }

    #[test]
    fn serialization_failure_leaves_medium_untouched() {
        let (medium, storage) = memory_storage();
        storage.set("k", &1);

        let err = storage.try_set("k", &Unserializable).unwrap_err();
        assert!(matches!(err, StorageError::Serialization { ref key, .. } if key == "k"));

        storage.set("k", &Unserializable);
        assert_eq!(medium.get_item("k").as_deref(), Some("1"));
    }

    #[test]
    fn non_string_map_keys_fail_to_serialize() {
        let (medium, storage) = memory_storage();
        let mut grid = BTreeMap::new();
        grid.insert((0u8, 1u8), "x");

        assert!(storage.try_set("grid", &grid).is_err());
        assert_eq!(medium.get_item("grid"), None);
    }

    #[test]
    fn deserialization_failure_returns_fallback() {
        let (medium, storage) = memory_storage();
        medium.set_item("broken", "{not json").unwrap();
        medium.set_item("text", "\"hello\"").unwrap();

        let err = storage.try_get::<i32>("broken").unwrap_err();
        assert!(matches!(err, StorageError::Deserialization { .. }));
        assert_eq!(storage.get("broken", 7), 7);
        assert_eq!(storage.get("text", 7), 7);
    }

    #[test]
    fn quota_failure_is_swallowed() {
        let storage = Storage::new(Arc::new(MemoryMedium::with_quota(4)), StorageScope::Session);
        storage.set("long", &"this does not fit");
        assert_eq!(storage.get_opt::<String>("long"), None);
        assert!(matches!(
            storage.try_set("long", &"this does not fit"),
            Err(StorageError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn clear_removes_foreign_keys_too() {
        let (medium, storage) = memory_storage();
        medium.set_item("foreign", "1").unwrap();
        storage.set("own", &2);

        storage.clear();
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn unavailable_storage_is_inert() {
        let storage = Storage::from_medium(None, StorageScope::Local);
        assert!(!storage.is_available());

        storage.set("k", &1);
        assert_eq!(storage.get("k", 0), 0);
        storage.remove("k");
        storage.clear();
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn browser_storage_scopes_are_isolated() {
        let storage = BrowserStorage::in_memory();
        storage.local.set("shared", &"local");
        storage.session.set("shared", &"session");

        assert_eq!(storage.local.get("shared", String::new()), "local");
        assert_eq!(storage.session.get("shared", String::new()), "session");

        storage.session.clear();
        assert_eq!(storage.local.get("shared", String::new()), "local");
        assert_eq!(storage.local.scope(), StorageScope::Local);
        assert_eq!(storage.session.scope().to_string(), "session");
    }
}
