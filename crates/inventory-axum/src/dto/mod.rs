//! Data transfer objects for HTTP requests and responses.

use inventory_core::{Item, ItemId};
use serde::{Deserialize, Serialize};

/// Item as returned by every endpoint that yields a record.
///
/// The photo is exposed as the URL it can be fetched from, never as the
/// stored file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemResponse {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub photo: Option<String>,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            photo: item.photo_url(),
        }
    }
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        let photo = item.photo_url();
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            photo,
        }
    }
}

/// Body returned after a successful delete.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

impl DeleteResponse {
    pub const fn deleted() -> Self {
        Self { message: "Deleted" }
    }
}

/// Form body of `POST /search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub has_photo: Option<String>,
}

impl SearchRequest {
    /// A checkbox that was ticked sends a non-empty value.
    pub fn wants_photo_hint(&self) -> bool {
        self.has_photo.as_deref().is_some_and(|v| !v.is_empty())
    }
}
