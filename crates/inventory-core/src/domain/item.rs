//! Item record types.
//!
//! These types represent inventory items as they live in the in-memory
//! collection and in the snapshot file.

use serde::{Deserialize, Serialize};

use super::asset::AssetRef;

/// Identifier of an item record. Always positive.
pub type ItemId = u64;

/// An inventory item record.
///
/// The serialized form is the snapshot entry format:
/// `{"id": 1, "name": "Drill", "description": "", "photoFile": null}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, assigned by the record store.
    pub id: ItemId,
    /// Display name, trimmed.
    pub name: String,
    /// Free-form description, trimmed, possibly empty.
    #[serde(default)]
    pub description: String,
    /// Reference to the bound photo asset, if any.
    #[serde(rename = "photoFile", default)]
    pub photo: Option<AssetRef>,
}

impl Item {
    /// Whether a photo asset is bound to this item.
    pub const fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    /// Public URL of the item's photo, if one is bound.
    pub fn photo_url(&self) -> Option<String> {
        self.photo.as_ref().map(|_| photo_url(self.id))
    }
}

/// Public URL under which the photo of item `id` is served.
pub fn photo_url(id: ItemId) -> String {
    format!("/inventory/{id}/photo")
}

/// Fields supplied when registering a new item.
///
/// Both fields are raw user input; trimming and validation happen in the
/// record store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewItem {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl NewItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of an item's text fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Result of the search-by-id helper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: ItemId,
    pub name: String,
    /// Description, with a photo link hint appended when requested.
    pub description: String,
}

/// Parse an externally supplied identifier.
///
/// Returns `None` for anything that is not a positive integer. Callers treat
/// `None` exactly like an unknown id.
pub fn parse_item_id(raw: &str) -> Option<ItemId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<ItemId>().ok().filter(|id| *id > 0)
}
