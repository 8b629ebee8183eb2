//! In-memory port implementations for unit tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::{AssetRef, Item, StagedAsset};
use crate::ports::{AssetStore, SnapshotStore, StorageError};

const ASSET_ROOT: &str = "/mem/photos";

#[derive(Default)]
pub struct MemoryAssetStore {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    pub fail_removes: AtomicBool,
}

impl MemoryAssetStore {
    pub fn with_files<const N: usize>(names: [&str; N]) -> Self {
        let store = Self::default();
        {
            let mut files = store.files.lock().unwrap();
            for name in names {
                files.insert(name.to_string(), name.as_bytes().to_vec());
            }
        }
        store
    }

    pub fn names(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    pub fn contains(&self, reference: &AssetRef) -> bool {
        self.files.lock().unwrap().contains_key(reference.as_str())
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn write_new(&self, bytes: &[u8]) -> Result<StagedAsset, StorageError> {
        let reference = AssetRef::generate();
        self.files
            .lock()
            .unwrap()
            .insert(reference.as_str().to_string(), bytes.to_vec());
        Ok(StagedAsset::new(Path::new(ASSET_ROOT).join(reference.as_str())))
    }

    fn bind(&self, written: &Path) -> Result<AssetRef, StorageError> {
        if written.parent() != Some(Path::new(ASSET_ROOT)) {
            return Err(StorageError::OutsideAssetDir(written.to_path_buf()));
        }
        written
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| AssetRef::parse(n).ok())
            .ok_or_else(|| StorageError::OutsideAssetDir(written.to_path_buf()))
    }

    async fn exists(&self, reference: &AssetRef) -> Result<bool, StorageError> {
        Ok(self.contains(reference))
    }

    async fn read(&self, reference: &AssetRef) -> Result<Vec<u8>, StorageError> {
        self.files
            .lock()
            .unwrap()
            .get(reference.as_str())
            .cloned()
            .ok_or_else(|| StorageError::NotFound(reference.to_string()))
    }

    async fn remove(&self, reference: &AssetRef) -> Result<bool, StorageError> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(StorageError::Io {
                path: PathBuf::from(ASSET_ROOT).join(reference.as_str()),
                reason: "simulated failure".to_string(),
            });
        }
        Ok(self.files.lock().unwrap().remove(reference.as_str()).is_some())
    }

    async fn list(&self) -> Result<Vec<AssetRef>, StorageError> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter_map(|n| AssetRef::parse(n.as_str()).ok())
            .collect())
    }
}

#[derive(Default)]
pub struct MemorySnapshotStore {
    saved: Mutex<Option<Vec<Item>>>,
    pub corrupt: AtomicBool,
    pub fail_saves: AtomicBool,
    /// While set, `save` waits for `release` before writing.
    pub hold_saves: AtomicBool,
    pub release: Notify,
    pub quarantines: AtomicUsize,
    pub saves: AtomicUsize,
}

impl MemorySnapshotStore {
    pub fn with_items(items: Vec<Item>) -> Self {
        let store = Self::default();
        *store.saved.lock().unwrap() = Some(items);
        store
    }

    pub fn corrupted() -> Self {
        let store = Self::default();
        store.corrupt.store(true, Ordering::SeqCst);
        store
    }

    pub fn saved(&self) -> Option<Vec<Item>> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<Option<Vec<Item>>, StorageError> {
        if self.corrupt.load(Ordering::SeqCst) {
            return Err(StorageError::Corrupt {
                path: PathBuf::from("/mem/inventory.json"),
                reason: "simulated corruption".to_string(),
            });
        }
        Ok(self.saved())
    }

    async fn save(&self, items: &[Item]) -> Result<(), StorageError> {
        if self.hold_saves.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Io {
                path: PathBuf::from("/mem/inventory.json"),
                reason: "simulated failure".to_string(),
            });
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.corrupt.store(false, Ordering::SeqCst);
        *self.saved.lock().unwrap() = Some(items.to_vec());
        Ok(())
    }

    async fn quarantine(&self) -> Result<Option<PathBuf>, StorageError> {
        self.quarantines.fetch_add(1, Ordering::SeqCst);
        Ok(Some(PathBuf::from("/mem/inventory.json.corrupt")))
    }

    fn location(&self) -> &Path {
        Path::new("/mem/inventory.json")
    }
}
