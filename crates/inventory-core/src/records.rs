//! In-memory record store.
//!
//! Holds the ordered item collection, assigns ids and validates fields.
//! It performs no I/O; persisting after a mutation is the caller's job.

use std::collections::HashSet;

use thiserror::Error;

use crate::domain::{AssetRef, Item, ItemId, ItemUpdate, NewItem};
use crate::ports::CoreError;

/// A collection that violates the store's invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("item id 0 is not allowed")]
    ZeroId,

    #[error("duplicate item id {0}")]
    DuplicateId(ItemId),

    #[error("asset {asset} is referenced by items {first} and {second}")]
    SharedAsset {
        asset: AssetRef,
        first: ItemId,
        second: ItemId,
    },
}

/// A record taken out of the collection, with the position it held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedItem {
    pub position: usize,
    pub item: Item,
}

/// Ordered collection of item records.
///
/// # Invariants
///
/// - ids are unique and positive
/// - no asset reference is held by two records
/// - insertion order is preserved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    items: Vec<Item>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from previously persisted items, checking invariants.
    pub fn from_items(items: Vec<Item>) -> Result<Self, IntegrityError> {
        let mut ids = HashSet::with_capacity(items.len());
        let mut owners: Vec<(&AssetRef, ItemId)> = Vec::new();

        for item in &items {
            if item.id == 0 {
                return Err(IntegrityError::ZeroId);
            }
            if !ids.insert(item.id) {
                return Err(IntegrityError::DuplicateId(item.id));
            }
            if let Some(asset) = &item.photo {
                if let Some((_, first)) = owners.iter().find(|(a, _)| *a == asset) {
                    return Err(IntegrityError::SharedAsset {
                        asset: asset.clone(),
                        first: *first,
                        second: item.id,
                    });
                }
                owners.push((asset, item.id));
            }
        }

        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The collection in insertion order.
    pub fn list_all(&self) -> &[Item] {
        &self.items
    }

    /// Next id: one more than the current maximum, or 1 when empty.
    ///
    /// The id of a deleted record is reissued only if that record held the
    /// maximum at the time it was deleted.
    pub fn next_id(&self) -> ItemId {
        self.items.iter().map(|i| i.id).max().map_or(1, |max| max + 1)
    }

    /// Append a new record.
    pub fn create(&mut self, new: NewItem, photo: Option<AssetRef>) -> Result<Item, CoreError> {
        let name = new.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(CoreError::Validation("item name is required".to_string()));
        }
        if let Some(asset) = &photo {
            self.ensure_unreferenced(asset)?;
        }

        let item = Item {
            id: self.next_id(),
            name: name.to_string(),
            description: new
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            photo,
        };
        self.items.push(item.clone());
        Ok(item)
    }

    pub fn get(&self, id: ItemId) -> Result<&Item, CoreError> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// Apply a partial update. Supplied fields are trimmed.
    pub fn update(&mut self, id: ItemId, update: ItemUpdate) -> Result<Item, CoreError> {
        let index = self.position(id)?;

        let name = update.name.as_deref().map(str::trim);
        if name.is_some_and(str::is_empty) {
            return Err(CoreError::Validation("item name cannot be blank".to_string()));
        }

        let item = &mut self.items[index];
        if let Some(name) = name {
            item.name = name.to_string();
        }
        if let Some(description) = update.description.as_deref() {
            item.description = description.trim().to_string();
        }
        Ok(item.clone())
    }

    /// Replace the photo reference, returning the updated record and the
    /// reference it held before.
    pub fn set_asset_ref(
        &mut self,
        id: ItemId,
        photo: Option<AssetRef>,
    ) -> Result<(Item, Option<AssetRef>), CoreError> {
        let index = self.position(id)?;
        if let Some(asset) = &photo
            && self.items[index].photo.as_ref() != Some(asset)
        {
            self.ensure_unreferenced(asset)?;
        }

        let item = &mut self.items[index];
        let old = std::mem::replace(&mut item.photo, photo);
        Ok((item.clone(), old))
    }

    /// Remove a record, returning it along with its former position.
    pub fn delete(&mut self, id: ItemId) -> Result<RemovedItem, CoreError> {
        let position = self.position(id)?;
        let item = self.items.remove(position);
        Ok(RemovedItem { position, item })
    }

    /// Put a removed record back where it was.
    pub fn restore(&mut self, removed: RemovedItem) {
        let position = removed.position.min(self.items.len());
        self.items.insert(position, removed.item);
    }

    /// Overwrite the record with the same id by `previous`.
    ///
    /// Used to undo an in-place mutation. Unknown ids are ignored.
    pub fn revert(&mut self, previous: Item) {
        if let Some(slot) = self.items.iter_mut().find(|i| i.id == previous.id) {
            *slot = previous;
        }
    }

    /// Every asset reference currently held by a record.
    pub fn referenced_assets(&self) -> HashSet<&AssetRef> {
        self.items.iter().filter_map(|i| i.photo.as_ref()).collect()
    }

    fn position(&self, id: ItemId) -> Result<usize, CoreError> {
        self.items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| not_found(id))
    }

    fn ensure_unreferenced(&self, asset: &AssetRef) -> Result<(), CoreError> {
        match self.items.iter().find(|i| i.photo.as_ref() == Some(asset)) {
            Some(owner) => Err(CoreError::Validation(format!(
                "asset {asset} is already bound to item {}",
                owner.id
            ))),
            None => Ok(()),
        }
    }
}

fn not_found(id: ItemId) -> CoreError {
    CoreError::NotFound(format!("item {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> AssetRef {
        AssetRef::parse(name).unwrap()
    }

    #[test]
    fn create_assigns_sequential_ids_and_trims() {
        let mut store = RecordStore::new();
        let drill = store
            .create(NewItem::new("  Drill ").with_description("  cordless "), None)
            .unwrap();
        let saw = store.create(NewItem::new("Saw"), None).unwrap();

        assert_eq!(drill.id, 1);
        assert_eq!(drill.name, "Drill");
        assert_eq!(drill.description, "cordless");
        assert_eq!(saw.id, 2);
        assert_eq!(saw.description, "");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn create_rejects_blank_or_missing_name() {
        let mut store = RecordStore::new();
        assert!(matches!(
            store.create(NewItem::new("   "), None),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            store.create(NewItem::default(), None),
            Err(CoreError::Validation(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn next_id_follows_maximum() {
        let mut store = RecordStore::new();
        for name in ["a", "b", "c"] {
            store.create(NewItem::new(name), None).unwrap();
        }
        store.delete(2).unwrap();
        assert_eq!(store.next_id(), 4);

        // Deleting the maximum lets its id be issued again.
        store.delete(3).unwrap();
        assert_eq!(store.next_id(), 2);
    }

    #[test]
    fn ids_stay_unique_across_mixed_operations() {
        let mut store = RecordStore::new();
        for round in 0..20 {
            store.create(NewItem::new(format!("item {round}")), None).unwrap();
            if round % 3 == 0 {
                let first = store.list_all()[0].id;
                store.delete(first).unwrap();
            }
        }
        let ids: HashSet<_> = store.list_all().iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), store.len());
    }

    #[test]
    fn update_is_partial() {
        let mut store = RecordStore::new();
        store
            .create(NewItem::new("Drill").with_description("old"), None)
            .unwrap();

        let updated = store
            .update(
                1,
                ItemUpdate {
                    name: None,
                    description: Some(" new ".to_string()),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Drill");
        assert_eq!(updated.description, "new");
    }

    #[test]
    fn update_rejects_blank_name_without_changes() {
        let mut store = RecordStore::new();
        store.create(NewItem::new("Drill"), None).unwrap();

        let result = store.update(
            1,
            ItemUpdate {
                name: Some("  ".to_string()),
                description: Some("changed".to_string()),
            },
        );
        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert_eq!(store.get(1).unwrap().description, "");
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut store = RecordStore::new();
        assert!(matches!(store.get(1), Err(CoreError::NotFound(_))));
        assert!(matches!(
            store.update(1, ItemUpdate::default()),
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            store.set_asset_ref(1, None),
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(store.delete(1), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn set_asset_ref_returns_previous() {
        let mut store = RecordStore::new();
        store.create(NewItem::new("Drill"), Some(asset("old.jpg"))).unwrap();

        let (item, old) = store.set_asset_ref(1, Some(asset("new.jpg"))).unwrap();
        assert_eq!(item.photo, Some(asset("new.jpg")));
        assert_eq!(old, Some(asset("old.jpg")));
    }

    #[test]
    fn asset_cannot_be_bound_twice() {
        let mut store = RecordStore::new();
        store.create(NewItem::new("Drill"), Some(asset("a.jpg"))).unwrap();
        store.create(NewItem::new("Saw"), None).unwrap();

        assert!(matches!(
            store.create(NewItem::new("Hammer"), Some(asset("a.jpg"))),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            store.set_asset_ref(2, Some(asset("a.jpg"))),
            Err(CoreError::Validation(_))
        ));
        // Re-binding the same asset to its owner is a no-op, not a conflict.
        assert!(store.set_asset_ref(1, Some(asset("a.jpg"))).is_ok());
    }

    #[test]
    fn delete_and_restore_keep_order() {
        let mut store = RecordStore::new();
        for name in ["a", "b", "c"] {
            store.create(NewItem::new(name), None).unwrap();
        }
        let removed = store.delete(2).unwrap();
        assert_eq!(removed.position, 1);
        assert_eq!(store.len(), 2);

        store.restore(removed);
        let names: Vec<_> = store.list_all().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn revert_restores_previous_version() {
        let mut store = RecordStore::new();
        let original = store.create(NewItem::new("Drill"), None).unwrap();
        store
            .update(
                1,
                ItemUpdate {
                    name: Some("Saw".to_string()),
                    description: None,
                },
            )
            .unwrap();

        store.revert(original.clone());
        assert_eq!(store.get(1).unwrap(), &original);
    }

    #[test]
    fn from_items_checks_integrity() {
        let item = |id, photo: Option<&str>| Item {
            id,
            name: format!("item {id}"),
            description: String::new(),
            photo: photo.map(asset),
        };

        assert!(RecordStore::from_items(vec![item(1, Some("a.jpg")), item(2, None)]).is_ok());
        assert_eq!(
            RecordStore::from_items(vec![item(0, None)]),
            Err(IntegrityError::ZeroId)
        );
        assert_eq!(
            RecordStore::from_items(vec![item(1, None), item(1, None)]),
            Err(IntegrityError::DuplicateId(1))
        );
        assert!(matches!(
            RecordStore::from_items(vec![item(1, Some("a.jpg")), item(2, Some("a.jpg"))]),
            Err(IntegrityError::SharedAsset { first: 1, second: 2, .. })
        ));
    }
}
