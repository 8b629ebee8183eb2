//! Composition utilities for building an [`InventoryService`] on disk.
//!
//! Construction only, no domain logic.

use std::sync::Arc;

use anyhow::Context;
use inventory_core::{
    AssetStore, CacheLayout, CorruptSnapshotPolicy, DirectoryCreationStrategy, InventoryService,
    SnapshotStore,
};
use tracing::info;

use crate::assets::FsAssetStore;
use crate::snapshot::JsonSnapshotStore;

/// A composed service plus the asset store it writes through.
///
/// Adapters need the asset store directly to stage uploads before handing
/// them to the service.
pub struct InventoryStores {
    pub inventory: Arc<InventoryService>,
    pub assets: Arc<dyn AssetStore>,
}

/// Factory for filesystem-backed stores.
pub struct StoreFactory;

impl StoreFactory {
    pub fn snapshot_store(layout: &CacheLayout) -> Arc<dyn SnapshotStore> {
        Arc::new(JsonSnapshotStore::from_layout(layout))
    }

    pub fn asset_store(layout: &CacheLayout) -> Arc<dyn AssetStore> {
        Arc::new(FsAssetStore::from_layout(layout))
    }

    /// Prepare the cache directory, load the collection and sweep orphaned
    /// photo files.
    ///
    /// Call this before accepting uploads: anything in the asset directory
    /// not referenced by the loaded collection is deleted.
    pub async fn open_inventory(
        layout: &CacheLayout,
        policy: CorruptSnapshotPolicy,
    ) -> anyhow::Result<InventoryStores> {
        layout
            .ensure(DirectoryCreationStrategy::AutoCreate)
            .with_context(|| format!("preparing cache directory {}", layout.root().display()))?;

        let snapshot = Self::snapshot_store(layout);
        let assets = Self::asset_store(layout);
        let inventory = InventoryService::open(snapshot, Arc::clone(&assets), policy)
            .await
            .context("loading inventory snapshot")?;

        let report = inventory
            .sweep_orphans()
            .await
            .context("sweeping photo directory")?;
        if !report.is_clean() {
            info!(
                target: "inventory.assets",
                removed = report.removed_orphans.len(),
                kept = report.kept_orphans.len(),
                dangling = report.dangling.len(),
                "photo directory reconciled"
            );
        }

        Ok(InventoryStores {
            inventory: Arc::new(inventory),
            assets,
        })
    }
}
