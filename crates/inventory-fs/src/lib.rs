//! Filesystem adapters for the inventory store.
//!
//! - [`JsonSnapshotStore`]: the collection as one JSON array, replaced
//!   atomically on every save
//! - [`FsAssetStore`]: one photo file per reference inside the asset
//!   directory
//! - [`StoreFactory`]: wires both into an [`inventory_core::InventoryService`]

#![deny(unused_crate_dependencies)]

pub mod assets;
pub mod factory;
pub mod snapshot;

pub use assets::FsAssetStore;
pub use factory::{InventoryStores, StoreFactory};
pub use snapshot::JsonSnapshotStore;

#[cfg(test)]
use tempfile as _;
