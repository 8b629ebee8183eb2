//! Domain types for the inventory.
//!
//! Pure data types with no I/O. Serialization derives describe the
//! snapshot file format.

mod asset;
mod item;

pub use asset::{ASSET_EXTENSION, AssetRef, InvalidAssetRef, StagedAsset};
pub use item::{Item, ItemId, ItemUpdate, NewItem, SearchHit, parse_item_id, photo_url};
