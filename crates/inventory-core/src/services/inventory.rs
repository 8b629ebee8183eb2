//! Inventory service - keeps the record store, the snapshot and the asset
//! directory consistent.
//!
//! Every mutating operation runs under one lock and follows the same
//! sequence: mutate the in-memory store, persist the snapshot, then settle
//! asset files through an [`AssetTransaction`]. If the snapshot write fails,
//! the in-memory mutation is reverted and any staged file is deleted, so
//! memory and disk never disagree once the call returns. The sequence runs
//! on its own task and completes even if the caller is dropped.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::transaction::AssetTransaction;
use crate::domain::{
    AssetRef, Item, ItemId, ItemUpdate, NewItem, SearchHit, StagedAsset, parse_item_id, photo_url,
};
use crate::ports::{AssetStore, CoreError, SnapshotStore, StorageError};
use crate::records::RecordStore;

/// What to do when the snapshot exists but cannot be read at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptSnapshotPolicy {
    /// Keep a copy of the unreadable file, start empty, overwrite the snapshot.
    #[default]
    Reset,
    /// Refuse to start.
    Fail,
}

/// Outcome of reconciling the asset directory with the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Unreferenced files that were deleted.
    pub removed_orphans: Vec<AssetRef>,
    /// Unreferenced files whose removal failed.
    pub kept_orphans: Vec<AssetRef>,
    /// Items whose photo reference names a missing file.
    pub dangling: Vec<ItemId>,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.removed_orphans.is_empty() && self.kept_orphans.is_empty() && self.dangling.is_empty()
    }
}

/// Service owning the item collection.
///
/// Cheap to share behind an `Arc`. Mutating calls run on a spawned task, so
/// a caller that stops polling (a dropped HTTP request) cannot interrupt a
/// mutation between the in-memory change and its persist or rollback.
pub struct InventoryService {
    inner: Arc<Inventory>,
}

struct Inventory {
    records: Mutex<RecordStore>,
    snapshot: Arc<dyn SnapshotStore>,
    assets: Arc<dyn AssetStore>,
}

impl InventoryService {
    /// Load the collection from the snapshot, or start empty.
    ///
    /// A missing snapshot is created empty. An unreadable one is handled per
    /// `policy`.
    pub async fn open(
        snapshot: Arc<dyn SnapshotStore>,
        assets: Arc<dyn AssetStore>,
        policy: CorruptSnapshotPolicy,
    ) -> Result<Self, CoreError> {
        let location = snapshot.location().display().to_string();

        let loaded = match snapshot.load().await {
            Ok(Some(items)) => RecordStore::from_items(items).map_err(|e| StorageError::Corrupt {
                path: snapshot.location().to_path_buf(),
                reason: e.to_string(),
            }),
            Ok(None) => {
                info!(target: "inventory.store", snapshot = %location, "no snapshot found, starting empty");
                snapshot.save(&[]).await?;
                Ok(RecordStore::new())
            }
            Err(e) => Err(e),
        };

        let records = match loaded {
            Ok(records) => records,
            Err(corrupt @ StorageError::Corrupt { .. }) => match policy {
                CorruptSnapshotPolicy::Fail => return Err(CoreError::Storage(corrupt)),
                CorruptSnapshotPolicy::Reset => {
                    let backup = snapshot.quarantine().await?;
                    warn!(
                        target: "inventory.store",
                        snapshot = %location,
                        backup = ?backup,
                        error = %corrupt,
                        "snapshot unreadable, resetting to an empty inventory"
                    );
                    snapshot.save(&[]).await?;
                    RecordStore::new()
                }
            },
            Err(other) => return Err(other.into()),
        };

        info!(target: "inventory.store", snapshot = %location, items = records.len(), "inventory loaded");

        Ok(Self {
            inner: Arc::new(Inventory {
                records: Mutex::new(records),
                snapshot,
                assets,
            }),
        })
    }

    /// Register a new item, optionally binding an uploaded photo.
    ///
    /// On any failure the uploaded file is deleted and nothing is stored.
    pub async fn register(
        &self,
        new: NewItem,
        upload: Option<StagedAsset>,
    ) -> Result<Item, CoreError> {
        let inventory = Arc::clone(&self.inner);
        run_detached(async move { inventory.register(new, upload).await }).await
    }

    /// All items in insertion order.
    pub async fn list(&self) -> Vec<Item> {
        self.inner.records.lock().await.list_all().to_vec()
    }

    /// Look up one item by an externally supplied id.
    pub async fn get(&self, raw_id: &str) -> Result<Item, CoreError> {
        let id = resolve(raw_id)?;
        self.inner.records.lock().await.get(id).cloned()
    }

    /// Update name and/or description.
    pub async fn update(&self, raw_id: &str, update: ItemUpdate) -> Result<Item, CoreError> {
        let id = resolve(raw_id)?;
        let inventory = Arc::clone(&self.inner);
        run_detached(async move { inventory.update(id, update).await }).await
    }

    /// Replace an item's photo with an uploaded file.
    ///
    /// The old file is deleted only after the new reference is durable.
    pub async fn replace_photo(&self, raw_id: &str, upload: StagedAsset) -> Result<Item, CoreError> {
        let raw_id = raw_id.to_owned();
        let inventory = Arc::clone(&self.inner);
        run_detached(async move { inventory.replace_photo(&raw_id, upload).await }).await
    }

    /// Delete an item and release its photo.
    pub async fn remove(&self, raw_id: &str) -> Result<Item, CoreError> {
        let id = resolve(raw_id)?;
        let inventory = Arc::clone(&self.inner);
        run_detached(async move { inventory.remove(id).await }).await
    }

    /// Read the photo bound to an item.
    ///
    /// Malformed id, unknown item, no photo and missing file all yield
    /// `CoreError::NotFound`.
    pub async fn photo(&self, raw_id: &str) -> Result<Vec<u8>, CoreError> {
        let item = self.get(raw_id).await?;
        let reference = item
            .photo
            .ok_or_else(|| CoreError::NotFound(format!("item {} has no photo", item.id)))?;
        Ok(self.inner.assets.read(&reference).await?)
    }

    /// Search helper: look up an item by id and optionally append a photo
    /// link hint to its description.
    pub async fn search(&self, raw_id: &str, photo_hint: bool) -> Result<SearchHit, CoreError> {
        let item = self.get(raw_id).await?;
        let mut description = item.description;
        if photo_hint && item.photo.is_some() {
            description.push_str(&format!(" (Photo: {})", photo_url(item.id)));
        }
        Ok(SearchHit {
            id: item.id,
            name: item.name,
            description,
        })
    }

    /// Reconcile the asset directory with the collection.
    ///
    /// Deletes files no record references and reports records whose file is
    /// missing. An orphan that cannot be deleted is logged and reported, not
    /// treated as an error. Files written by an upload that has not reached
    /// `register` or `replace_photo` yet look like orphans, so run this
    /// before the server starts accepting uploads.
    pub async fn sweep_orphans(&self) -> Result<SweepReport, CoreError> {
        let assets = self.inner.assets.as_ref();
        let records = self.inner.records.lock().await;
        let referenced = records.referenced_assets();
        let mut report = SweepReport::default();

        for asset in assets.list().await? {
            if referenced.contains(&asset) {
                continue;
            }
            match assets.remove(&asset).await {
                Ok(true) => {
                    warn!(target: "inventory.assets", asset = %asset, "removed orphan asset");
                    report.removed_orphans.push(asset);
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(target: "inventory.assets", asset = %asset, error = %e, "failed to remove orphan asset");
                    report.kept_orphans.push(asset);
                }
            }
        }

        for item in records.list_all() {
            if let Some(asset) = &item.photo
                && !assets.exists(asset).await?
            {
                warn!(target: "inventory.assets", id = item.id, asset = %asset, "item photo file is missing");
                report.dangling.push(item.id);
            }
        }

        Ok(report)
    }
}

impl Inventory {
    async fn register(&self, new: NewItem, upload: Option<StagedAsset>) -> Result<Item, CoreError> {
        let staged = upload
            .map(|u| self.assets.bind(u.path()))
            .transpose()?;
        let tx = AssetTransaction::begin(self.assets.as_ref(), staged.clone());

        let mut records = self.records.lock().await;
        let item = match records.create(new, staged) {
            Ok(item) => item,
            Err(e) => {
                drop(records);
                tx.rollback().await;
                return Err(e);
            }
        };

        if let Err(e) = self.snapshot.save(records.list_all()).await {
            // The item was created under this lock, so the delete cannot miss.
            records.delete(item.id).ok();
            drop(records);
            tx.rollback().await;
            return Err(e.into());
        }
        drop(records);

        tx.commit(None).finish().await;
        info!(target: "inventory.store", id = item.id, photo = item.has_photo(), "item registered");
        Ok(item)
    }

    async fn update(&self, id: ItemId, update: ItemUpdate) -> Result<Item, CoreError> {
        let mut records = self.records.lock().await;
        let previous = records.get(id)?.clone();
        let item = records.update(id, update)?;

        if let Err(e) = self.snapshot.save(records.list_all()).await {
            records.revert(previous);
            return Err(e.into());
        }

        debug!(target: "inventory.store", id, "item updated");
        Ok(item)
    }

    async fn replace_photo(&self, raw_id: &str, upload: StagedAsset) -> Result<Item, CoreError> {
        let staged = self.assets.bind(upload.path())?;
        let tx = AssetTransaction::begin(self.assets.as_ref(), Some(staged.clone()));

        let mut records = self.records.lock().await;
        let previous = match resolve(raw_id).and_then(|id| records.get(id).cloned()) {
            Ok(item) => item,
            Err(e) => {
                drop(records);
                tx.rollback().await;
                return Err(e);
            }
        };

        let (item, old) = match records.set_asset_ref(previous.id, Some(staged)) {
            Ok(result) => result,
            Err(e) => {
                drop(records);
                tx.rollback().await;
                return Err(e);
            }
        };

        if let Err(e) = self.snapshot.save(records.list_all()).await {
            records.revert(previous);
            drop(records);
            tx.rollback().await;
            return Err(e.into());
        }
        drop(records);

        tx.commit(old).finish().await;
        info!(target: "inventory.store", id = item.id, "photo replaced");
        Ok(item)
    }

    async fn remove(&self, id: ItemId) -> Result<Item, CoreError> {
        let mut records = self.records.lock().await;
        let removed = records.delete(id)?;

        if let Err(e) = self.snapshot.save(records.list_all()).await {
            records.restore(removed);
            return Err(e.into());
        }
        drop(records);

        let item = removed.item;
        AssetTransaction::begin(self.assets.as_ref(), None)
            .commit(item.photo.clone())
            .finish()
            .await;
        info!(target: "inventory.store", id = item.id, "item deleted");
        Ok(item)
    }
}

/// Drive a mutation to completion even if the caller is dropped.
async fn run_detached<T, F>(work: F) -> Result<T, CoreError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, CoreError>> + Send + 'static,
{
    match tokio::spawn(work).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => Err(CoreError::Interrupted(e.to_string())),
    }
}

fn resolve(raw_id: &str) -> Result<ItemId, CoreError> {
    parse_item_id(raw_id).ok_or_else(|| CoreError::NotFound(format!("item {raw_id:?}")))
}
