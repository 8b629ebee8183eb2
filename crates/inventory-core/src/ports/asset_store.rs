//! Asset store trait definition.
//!
//! This port owns the asset directory: every photo file is created, read
//! and deleted through it.

use std::path::Path;

use async_trait::async_trait;

use super::StorageError;
use crate::domain::{AssetRef, StagedAsset};

/// Storage for photo assets, one file per reference.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Write `bytes` under a freshly generated unique name.
    ///
    /// This is the upload mechanism: the returned file is staged, not bound.
    async fn write_new(&self, bytes: &[u8]) -> Result<StagedAsset, StorageError>;

    /// Turn a path written by the upload mechanism into a reference.
    ///
    /// Fails with `StorageError::OutsideAssetDir` if `written` is not a file
    /// directly inside the asset directory.
    fn bind(&self, written: &Path) -> Result<AssetRef, StorageError>;

    /// Whether the file for `reference` exists.
    async fn exists(&self, reference: &AssetRef) -> Result<bool, StorageError>;

    /// Read the whole asset. `StorageError::NotFound` if the file is missing.
    async fn read(&self, reference: &AssetRef) -> Result<Vec<u8>, StorageError>;

    /// Delete the file for `reference`.
    ///
    /// Idempotent: returns `Ok(false)` if there was no such file.
    async fn remove(&self, reference: &AssetRef) -> Result<bool, StorageError>;

    /// All asset files currently in the directory.
    async fn list(&self) -> Result<Vec<AssetRef>, StorageError>;
}
