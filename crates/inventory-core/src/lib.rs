//! Core of the inventory record store.
//!
//! Items live in an in-memory [`RecordStore`], are mirrored to a snapshot
//! through the [`SnapshotStore`] port, and may each own one photo file
//! managed through the [`AssetStore`] port. [`InventoryService`] ties the
//! three together and keeps them consistent:
//!
//! - every mutation is persisted before the call returns
//! - a new photo is written before the record that references it is
//!   committed, and a replaced photo is deleted only after the commit
//! - a failed request leaves neither orphaned files nor half-applied
//!   records behind
//!
//! This crate has no filesystem or HTTP code; see `inventory-fs` and
//! `inventory-axum` for the adapters.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod records;
pub mod services;

#[cfg(test)]
mod testing;

pub use domain::{
    AssetRef, InvalidAssetRef, Item, ItemId, ItemUpdate, NewItem, SearchHit, StagedAsset,
    parse_item_id, photo_url,
};
pub use paths::{CacheLayout, DirectoryCreationStrategy, PathError};
pub use ports::{AssetStore, CoreError, SnapshotStore, StorageError};
pub use records::{IntegrityError, RecordStore, RemovedItem};
pub use services::{CorruptSnapshotPolicy, InventoryService, SweepReport};
