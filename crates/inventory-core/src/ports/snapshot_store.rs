//! Snapshot store trait definition.
//!
//! This port defines how the whole item collection is made durable.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::StorageError;
use crate::domain::Item;

/// Durable mirror of the item collection.
///
/// Implementations always read and write the full ordered collection; there
/// is no incremental update.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the snapshot.
    ///
    /// Returns `Ok(None)` when no snapshot exists yet and
    /// `Err(StorageError::Corrupt)` when one exists but cannot be parsed.
    async fn load(&self) -> Result<Option<Vec<Item>>, StorageError>;

    /// Replace the snapshot with `items`, in order.
    ///
    /// Must not leave a partially written snapshot behind on failure.
    async fn save(&self, items: &[Item]) -> Result<(), StorageError>;

    /// Copy an unreadable snapshot aside before it gets overwritten.
    ///
    /// Returns the backup location, or `None` if there was nothing to copy.
    async fn quarantine(&self) -> Result<Option<PathBuf>, StorageError>;

    /// Where the snapshot lives, for diagnostics.
    fn location(&self) -> &Path;
}
