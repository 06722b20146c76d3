//! Serialized key/value storage.
//!
//! A [`Storage`] adapts a string-keyed [`Medium`] so callers store and load
//! structured values instead of raw text. Values travel as JSON through
//! `serde_json`.
//!
//! Three media ship with the crate:
//! - [`MemoryMedium`] for session-scoped data, with an optional byte quota
//! - [`FileMedium`] for data that must outlive the process
//! - [`NullMedium`] for hosts with no storage at all
//!
//! [`BrowserStorage`] pairs a local and a session wrapper the way a browser
//! exposes `localStorage` and `sessionStorage`.

mod error;
mod file;
mod medium;
mod storage;

pub use error::StorageError;
pub use file::FileMedium;
pub use medium::{MemoryMedium, Medium, NullMedium};
pub use storage::{BrowserStorage, Storage, StorageScope};
