//! JSON snapshot file.
//!
//! The whole collection is stored as one pretty-printed JSON array. Writes
//! go to a sibling temp file that is synced and renamed over the snapshot,
//! so readers only ever see a complete file.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use inventory_core::{CacheLayout, Item, SnapshotStore, StorageError};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Snapshot store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_layout(layout: &CacheLayout) -> Self {
        Self::new(layout.snapshot_path())
    }

    /// Sibling of the snapshot with `suffix` appended to the file name.
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("inventory.json"), ToOwned::to_owned);
        name.push(suffix);
        self.path.with_file_name(name)
    }

    async fn write_new(path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        file.write_all(contents).await?;
        file.sync_all().await
    }

    async fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = fs::File::create(path).await?;
        file.write_all(contents).await?;
        file.sync_all().await
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn load(&self) -> Result<Option<Vec<Item>>, StorageError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&self.path, &e)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }

    async fn save(&self, items: &[Item]) -> Result<(), StorageError> {
        let json =
            serde_json::to_vec_pretty(items).map_err(|e| StorageError::Serialization(e.to_string()))?;
        let temp = self.sibling(".tmp");

        if let Err(e) = Self::write_synced(&temp, &json).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StorageError::io(&temp, &e));
        }
        if let Err(e) = fs::rename(&temp, &self.path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StorageError::io(&self.path, &e));
        }

        debug!(target: "inventory.store", path = %self.path.display(), items = items.len(), "snapshot written");
        Ok(())
    }

    async fn quarantine(&self) -> Result<Option<PathBuf>, StorageError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&self.path, &e)),
        };

        // Earlier backups are never overwritten.
        let first = self.sibling(".corrupt");
        let backup = match Self::write_new(&first, &bytes).await {
            Ok(()) => first,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let stamp = Utc::now().format("%Y%m%dT%H%M%S%3f");
                let stamped = self.sibling(&format!(".corrupt-{stamp}"));
                Self::write_new(&stamped, &bytes)
                    .await
                    .map_err(|e| StorageError::io(&stamped, &e))?;
                stamped
            }
            Err(e) => return Err(StorageError::io(&first, &e)),
        };
        Ok(Some(backup))
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
