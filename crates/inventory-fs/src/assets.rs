//! Photo files on disk.
//!
//! Each asset is a plain file directly inside the asset directory, named by
//! its [`AssetRef`]. Hidden files (leading `.`) are never treated as assets.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use inventory_core::{AssetRef, AssetStore, CacheLayout, StagedAsset, StorageError};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Asset store backed by a directory.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    dir: PathBuf,
}

impl FsAssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_layout(layout: &CacheLayout) -> Self {
        Self::new(layout.asset_dir())
    }

    /// Absolute location of the file for `reference`.
    pub fn path_of(&self, reference: &AssetRef) -> PathBuf {
        self.dir.join(reference.as_str())
    }

    async fn create_new(path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        file.write_all(bytes).await?;
        file.sync_all().await
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn write_new(&self, bytes: &[u8]) -> Result<StagedAsset, StorageError> {
        let reference = AssetRef::generate();
        let path = self.path_of(&reference);

        if let Err(e) = Self::create_new(&path, bytes).await {
            // Don't delete a file we did not create.
            if e.kind() != io::ErrorKind::AlreadyExists {
                let _ = fs::remove_file(&path).await;
            }
            return Err(StorageError::io(&path, &e));
        }

        debug!(target: "inventory.assets", asset = %reference, bytes = bytes.len(), "asset staged");
        Ok(StagedAsset::new(path))
    }

    fn bind(&self, written: &Path) -> Result<AssetRef, StorageError> {
        if written.parent() != Some(self.dir.as_path()) {
            return Err(StorageError::OutsideAssetDir(written.to_path_buf()));
        }
        written
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.starts_with('.'))
            .and_then(|name| AssetRef::parse(name).ok())
            .ok_or_else(|| StorageError::OutsideAssetDir(written.to_path_buf()))
    }

    async fn exists(&self, reference: &AssetRef) -> Result<bool, StorageError> {
        let path = self.path_of(reference);
        fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::io(&path, &e))
    }

    async fn read(&self, reference: &AssetRef) -> Result<Vec<u8>, StorageError> {
        let path = self.path_of(reference);
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(format!("asset {reference}")))
            }
            Err(e) => Err(StorageError::io(&path, &e)),
        }
    }

    async fn remove(&self, reference: &AssetRef) -> Result<bool, StorageError> {
        let path = self.path_of(reference);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(&path, &e)),
        }
    }

    async fn list(&self) -> Result<Vec<AssetRef>, StorageError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(&self.dir, &e)),
        };

        let mut assets = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(&self.dir, &e))?
        {
            let is_file = entry
                .file_type()
                .await
                .map_err(|e| StorageError::io(entry.path(), &e))?
                .is_file();
            if !is_file {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if let Ok(reference) = AssetRef::parse(name) {
                assets.push(reference);
            }
        }

        assets.sort();
        Ok(assets)
    }
}
