//! # Pantry Context Builder
//!
//! The pantry context is everything the user already owns except the chosen
//! main ingredient. It travels with each recipe request so the generator can
//! favour what is on hand.

use std::collections::BTreeSet;

use crate::inventory::InventorySnapshot;

/// Lowercase owned names across all locations, minus `main_ingredient`.
///
/// Comparison is case-insensitive and duplicates collapse. The set is ordered so
/// request payloads are deterministic.
///
/// # Examples
///
/// ```
/// use intelli_foods::inventory::{FoodItem, InventorySnapshot, StorageLocation};
/// use intelli_foods::pantry::build_pantry_context;
///
/// let mut snapshot = InventorySnapshot::with_vocabulary(["Flour", "Fish"]);
/// snapshot.apply_add(StorageLocation::Shelf, FoodItem::new("Flour"));
///
/// assert!(build_pantry_context("Flour", &snapshot).is_empty());
/// ```
pub fn build_pantry_context(main_ingredient: &str, snapshot: &InventorySnapshot) -> BTreeSet<String> {
    let excluded = main_ingredient.to_lowercase();
    snapshot
        .all_items()
        .map(|item| item.name.to_lowercase())
        .filter(|name| *name != excluded)
        .collect()
}
