//! # Satchel
//!
//! Small, independent helpers for application state and user-facing text.
//!
//! ## Store
//!
//! A single-value observable container:
//! - `Store<T>` - Holds a value and calls subscribers synchronously on change
//! - `Subscription` - Handle for removing a subscriber again
//!
//! ## Storage
//!
//! Structured values over a string key/value medium:
//! - `Storage` - Serializes values to JSON and never fails at its boundary
//! - `Medium` - The substrate: in memory, on disk, or absent altogether
//! - `BrowserStorage` - Independent local and session storage
//!
//! ## Helpers
//!
//! - `format` - Dates, relative times, colors, numbers, currency, text
//! - `validate` - Email, URL, digits, password strength, blank input
//! - `urls` - Query-string lookups and edits
//! - `id` - Random UUIDs

pub mod format;
pub mod id;
pub mod storage;
pub mod store;
pub mod urls;
pub mod validate;

// Re-export main types for convenience
pub use storage::{BrowserStorage, Medium, Storage, StorageError, StorageScope};
pub use store::{Store, Subscription, SubscriptionGuard};
