//! Port definitions (trait abstractions) for storage.
//!
//! Ports define the interfaces that the core expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No filesystem layout decisions in any signature
//! - The snapshot port reads and writes the whole collection at once
//! - The asset port owns every file inside the asset directory

pub mod asset_store;
pub mod snapshot_store;

use std::path::PathBuf;

use thiserror::Error;

pub use asset_store::AssetStore;
pub use snapshot_store::SnapshotStore;

/// Storage-level errors raised by port implementations.
///
/// This error type abstracts away I/O details and gives services a small
/// set of cases to react to.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested file does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A read, write, rename or delete failed.
    #[error("I/O error on {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    /// Serializing the collection failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The snapshot exists but cannot be understood.
    #[error("Corrupt snapshot {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// A path handed to the asset store does not name a file directly
    /// inside the asset directory.
    #[error("Not inside the asset directory: {0}")]
    OutsideAssetDir(PathBuf),
}

impl StorageError {
    /// Build an `Io` error from a path and a `std::io::Error`.
    pub fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

/// Core error type for semantic domain errors.
///
/// This is the canonical error type returned by the inventory service.
/// Adapters map it to their own error types (HTTP status codes, CLI exit
/// codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Required input missing or blank.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed id, unknown record, or missing photo file. The three causes
    /// are deliberately reported the same way.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Snapshot or asset storage failed.
    #[error(transparent)]
    Storage(StorageError),

    /// A mutation's task was cancelled before it finished, which only
    /// happens while the runtime shuts down.
    #[error("Interrupted: {0}")]
    Interrupted(String),
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => Self::NotFound(msg),
            other => Self::Storage(other),
        }
    }
}
