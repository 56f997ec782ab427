//! Edits to the items on a trip's list, and the grouped view of it.

use std::collections::BTreeMap;

use non_empty_string::NonEmptyString;
use serde::Serialize;
use tracing::instrument;

use crate::{
    domain::{Catalog, ItemId, NewItem, TripId, TripPackingItem},
    engine::{Error, NotFound, PackingEngine, ValidationError, validate_qty},
    storage::{Guard, Store, StoreError, Transaction, Write},
};

/// The items of one category, in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    /// The category id.
    pub category_id: String,
    /// The category label, or the raw id for unknown categories.
    pub label: String,
    /// Icon key, for known categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// The items in this category.
    pub items: Vec<TripPackingItem>,
    /// How many of the items are packed.
    pub packed_count: usize,
    /// How many items there are.
    pub total_count: usize,
}

impl CategoryGroup {
    fn new(category_id: String, label: String, icon: Option<String>) -> Self {
        Self {
            category_id,
            label,
            icon,
            items: Vec::new(),
            packed_count: 0,
            total_count: 0,
        }
    }

    fn push(&mut self, item: TripPackingItem) {
        if item.packed {
            self.packed_count += 1;
        }
        self.total_count += 1;
        self.items.push(item);
    }
}

/// Groups items by category.
///
/// Known categories come first, in the catalog's sort order. Items whose
/// category the catalog does not know come last, grouped by id. Empty
/// categories are left out.
#[must_use]
pub fn group_items_by_category(
    catalog: &Catalog,
    items: impl IntoIterator<Item = TripPackingItem>,
) -> Vec<CategoryGroup> {
    let mut known: Vec<_> = catalog
        .categories()
        .iter()
        .map(|category| {
            CategoryGroup::new(
                category.id.clone(),
                category.label.clone(),
                category.icon.clone(),
            )
        })
        .collect();
    let mut unknown: BTreeMap<String, CategoryGroup> = BTreeMap::new();

    for item in items {
        if let Some(group) = known
            .iter_mut()
            .find(|group| group.category_id == item.category_id)
        {
            group.push(item);
        } else {
            unknown
                .entry(item.category_id.clone())
                .or_insert_with(|| {
                    CategoryGroup::new(item.category_id.clone(), item.category_id.clone(), None)
                })
                .push(item);
        }
    }

    known.retain(|group| group.total_count > 0);
    known.extend(unknown.into_values());
    known
}

impl<S: Store> PackingEngine<S> {
    /// Adds an item authored by the user.
    ///
    /// The name is trimmed. The category may be given as an id or a label,
    /// and falls back to `other` when it is missing or unknown.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an empty name or a zero quantity, or
    /// an error if the trip cannot be written.
    #[instrument(skip(self))]
    pub fn add_custom_item(&self, trip_id: TripId, item: NewItem) -> Result<TripPackingItem, Error> {
        let name = NonEmptyString::new(item.name.trim().to_string())
            .map_err(|_| ValidationError::EmptyName)?;
        validate_qty(item.qty)?;

        let category = self.catalog.normalize_category(item.category.as_deref());
        let added = TripPackingItem::custom(name.as_str().to_string(), category.to_string(), item.qty);

        self.store
            .commit(trip_id, Transaction::new().write(Write::PutItem(added.clone())))?;

        tracing::info!("Added '{}' to {}", added.name, added.category_id);
        Ok(added)
    }

    /// Flips the packed state of an item.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if the trip or the item does not exist.
    #[instrument(skip(self))]
    pub fn toggle_packed(&self, trip_id: TripId, item_id: ItemId) -> Result<TripPackingItem, Error> {
        let mut item = self.find_item(trip_id, item_id)?;
        item.packed = !item.packed;
        item.touch();
        self.put_existing(trip_id, item)
    }

    /// Sets the number of units to pack.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::QuantityTooLow`] for a zero quantity, before
    /// anything is read, or [`NotFound`] if the trip or the item does not
    /// exist.
    #[instrument(skip(self))]
    pub fn update_quantity(
        &self,
        trip_id: TripId,
        item_id: ItemId,
        qty: u32,
    ) -> Result<TripPackingItem, Error> {
        validate_qty(qty)?;

        let mut item = self.find_item(trip_id, item_id)?;
        item.qty = qty;
        item.touch();
        self.put_existing(trip_id, item)
    }

    /// Removes an item from the list.
    ///
    /// Any suggestion record for the item's catalog entry is kept.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if the trip or the item does not exist.
    #[instrument(skip(self))]
    pub fn delete_item(&self, trip_id: TripId, item_id: ItemId) -> Result<(), Error> {
        let transaction = Transaction::new()
            .guard(Guard::ItemExists(item_id))
            .write(Write::DeleteItem(item_id));
        self.store
            .commit(trip_id, transaction)
            .map_err(|e| item_conflict(e, item_id))?;

        tracing::info!("Removed item {item_id}");
        Ok(())
    }

    /// Groups items by category, using this engine's catalog.
    #[must_use]
    pub fn group_items_by_category(
        &self,
        items: impl IntoIterator<Item = TripPackingItem>,
    ) -> Vec<CategoryGroup> {
        group_items_by_category(&self.catalog, items)
    }

    /// Reads a trip's list and groups it by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the trip cannot be read.
    pub fn packing_list(&self, trip_id: TripId) -> Result<Vec<CategoryGroup>, Error> {
        let items = self.store.items(trip_id)?;
        Ok(self.group_items_by_category(items))
    }

    fn find_item(&self, trip_id: TripId, item_id: ItemId) -> Result<TripPackingItem, Error> {
        self.store
            .items(trip_id)?
            .into_iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| NotFound::Item(item_id).into())
    }

    fn put_existing(&self, trip_id: TripId, item: TripPackingItem) -> Result<TripPackingItem, Error> {
        let transaction = Transaction::new()
            .guard(Guard::ItemExists(item.id))
            .write(Write::PutItem(item.clone()));
        self.store
            .commit(trip_id, transaction)
            .map_err(|e| item_conflict(e, item.id))?;
        Ok(item)
    }
}

fn item_conflict(error: StoreError, item_id: ItemId) -> Error {
    match error {
        StoreError::Conflict(Guard::ItemExists(_)) => NotFound::Item(item_id).into(),
        other => other.into(),
    }
}
