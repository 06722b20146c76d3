use std::path::PathBuf;

use thiserror::Error;

/// Failures raised below the [`Storage`](super::Storage) boundary.
///
/// The wrapper's infallible methods log these and fall back; the `try_*`
/// methods hand them to the caller.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot serialize value for key '{key}': {source}")]
    Serialization {
        key: String,
        source: serde_json::Error,
    },

    #[error("cannot deserialize value stored under key '{key}': {source}")]
    Deserialization {
        key: String,
        source: serde_json::Error,
    },

    #[error("quota exceeded writing key '{key}': {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    #[error("storage file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("storage file {} is not a JSON object of strings: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl StorageError {
    /// The key involved, when the failure concerns a single entry.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Serialization { key, .. }
            | Self::Deserialization { key, .. }
            | Self::QuotaExceeded { key, .. } => Some(key),
            Self::Io { .. } | Self::Corrupt { .. } => None,
        }
    }
}
