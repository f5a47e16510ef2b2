//! # Inventory Snapshot
//!
//! In-memory view of every food item across the three storage locations, plus
//! the vocabulary of known ingredient names. The snapshot is loaded once per
//! session and then patched in place after each confirmed storage mutation, so
//! it stays consistent with the backend without a full reload.
//!
//! Patches perform no validation; that happens before a mutation is proposed.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::{AppError, AppResult};

/// One of the three fixed storage buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageLocation {
    Shelf,
    Fridge,
    Freezer,
}

impl StorageLocation {
    /// All locations, in display order
    pub const ALL: [StorageLocation; 3] = [
        StorageLocation::Shelf,
        StorageLocation::Fridge,
        StorageLocation::Freezer,
    ];

    /// Lowercase name, also used as the storage endpoint path segment
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageLocation::Shelf => "shelf",
            StorageLocation::Fridge => "fridge",
            StorageLocation::Freezer => "freezer",
        }
    }

    /// Capitalized label ("Shelf", "Fridge", "Freezer")
    pub fn title(&self) -> &'static str {
        match self {
            StorageLocation::Shelf => "Shelf",
            StorageLocation::Fridge => "Fridge",
            StorageLocation::Freezer => "Freezer",
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageLocation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shelf" => Ok(StorageLocation::Shelf),
            "fridge" => Ok(StorageLocation::Fridge),
            "freezer" => Ok(StorageLocation::Freezer),
            other => Err(AppError::Validation(format!(
                "unknown storage location '{}', expected shelf, fridge or freezer",
                other
            ))),
        }
    }
}

/// A food item held in one storage location.
///
/// Only `name` is interpreted; every other field the backend sends (quantity,
/// expiry, ...) is carried through untouched in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl FoodItem {
    /// Create an item with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: serde_json::Map::new(),
        }
    }

    /// Attach an opaque attribute, builder style
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// Treat an explicit `null` the same as a missing list
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// All items across the storage locations plus the ingredient vocabulary.
///
/// Deserializes directly from the inventory service's fridge-data payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub shelf: Vec<FoodItem>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fridge: Vec<FoodItem>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub freezer: Vec<FoodItem>,
    #[serde(default, rename = "uniqueIngredients", deserialize_with = "null_as_empty")]
    pub vocabulary: Vec<String>,
}

impl InventorySnapshot {
    /// Create an empty snapshot with the given vocabulary
    pub fn with_vocabulary<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: vocabulary.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Items stored at `location`, in backend order
    pub fn items(&self, location: StorageLocation) -> &[FoodItem] {
        match location {
            StorageLocation::Shelf => &self.shelf,
            StorageLocation::Fridge => &self.fridge,
            StorageLocation::Freezer => &self.freezer,
        }
    }

    fn items_mut(&mut self, location: StorageLocation) -> &mut Vec<FoodItem> {
        match location {
            StorageLocation::Shelf => &mut self.shelf,
            StorageLocation::Fridge => &mut self.fridge,
            StorageLocation::Freezer => &mut self.freezer,
        }
    }

    /// Every item across shelf, fridge and freezer
    pub fn all_items(&self) -> impl Iterator<Item = &FoodItem> {
        self.shelf.iter().chain(self.fridge.iter()).chain(self.freezer.iter())
    }

    /// Lowercase names of everything currently owned
    pub fn owned_names(&self) -> HashSet<String> {
        self.all_items().map(|item| item.name.to_lowercase()).collect()
    }

    /// Case-insensitive ownership check
    pub fn is_owned(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.all_items().any(|item| item.name.to_lowercase() == needle)
    }

    /// Total number of items across all locations
    pub fn item_count(&self) -> usize {
        self.shelf.len() + self.fridge.len() + self.freezer.len()
    }

    /// Append `item` to the end of `location`
    pub fn apply_add(&mut self, location: StorageLocation, item: FoodItem) {
        self.items_mut(location).push(item);
    }

    /// Replace the item at `index` in `location`
    pub fn apply_edit(
        &mut self,
        location: StorageLocation,
        index: usize,
        item: FoodItem,
    ) -> AppResult<()> {
        let items = self.items_mut(location);
        let len = items.len();
        let slot = items
            .get_mut(index)
            .ok_or(AppError::IndexOutOfRange { index, len })?;
        *slot = item;
        Ok(())
    }

    /// Remove and return the item at `index` in `location`, keeping the order of the rest
    pub fn apply_delete(&mut self, location: StorageLocation, index: usize) -> AppResult<FoodItem> {
        let items = self.items_mut(location);
        if index >= items.len() {
            return Err(AppError::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }
        Ok(items.remove(index))
    }
}
