//! # Ingredient Matcher
//!
//! Turns the text typed into the main-ingredient box into a ranked list of
//! suggestions drawn from the ingredient vocabulary.
//!
//! ## Ranking
//!
//! 1. Keep vocabulary names whose lowercase form starts with the lowercase input
//! 2. Flag each name as owned if it is stored anywhere in the kitchen
//! 3. Stable partition: owned names first, vocabulary order preserved on both sides
//!
//! An empty input produces no suggestions at all rather than the whole vocabulary.

use serde::Serialize;

use crate::inventory::InventorySnapshot;

/// A suggestion shown in the main-ingredient dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientCandidate {
    pub name: String,
    pub owned: bool,
}

impl IngredientCandidate {
    /// Availability label shown next to the suggestion
    pub fn availability_label(&self) -> &'static str {
        if self.owned {
            "Available"
        } else {
            "Unavailable"
        }
    }
}

/// Rank vocabulary names against `input`, owned ingredients first.
///
/// # Examples
///
/// ```
/// use intelli_foods::inventory::{FoodItem, InventorySnapshot, StorageLocation};
/// use intelli_foods::matcher::match_ingredients;
///
/// let mut snapshot = InventorySnapshot::with_vocabulary(["Flour", "Fish"]);
/// snapshot.apply_add(StorageLocation::Shelf, FoodItem::new("Flour"));
///
/// let candidates = match_ingredients("f", &snapshot);
/// assert_eq!(candidates[0].name, "Flour");
/// assert!(candidates[0].owned);
/// assert!(!candidates[1].owned);
/// assert!(match_ingredients("", &snapshot).is_empty());
/// ```
pub fn match_ingredients(input: &str, snapshot: &InventorySnapshot) -> Vec<IngredientCandidate> {
    if input.is_empty() {
        return Vec::new();
    }

    let prefix = input.to_lowercase();
    let owned = snapshot.owned_names();

    let mut candidates: Vec<IngredientCandidate> = snapshot
        .vocabulary
        .iter()
        .filter(|name| name.to_lowercase().starts_with(&prefix))
        .map(|name| IngredientCandidate {
            name: name.clone(),
            owned: owned.contains(&name.to_lowercase()),
        })
        .collect();

    // sort_by_key is stable
    candidates.sort_by_key(|candidate| !candidate.owned);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{FoodItem, StorageLocation};

    fn kitchen() -> InventorySnapshot {
        let mut snapshot = InventorySnapshot::with_vocabulary([
            "Bacon", "Basil", "Beef", "Beans", "Broccoli", "Butter", "Carrot",
        ]);
        snapshot.apply_add(StorageLocation::Fridge, FoodItem::new("butter"));
        snapshot.apply_add(StorageLocation::Freezer, FoodItem::new("Beef"));
        snapshot.apply_add(StorageLocation::Shelf, FoodItem::new("Rice"));
        snapshot
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(match_ingredients("", &kitchen()).is_empty());
    }

    #[test]
    fn test_prefix_not_substring() {
        let names: Vec<String> = match_ingredients("ar", &kitchen())
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert!(names.is_empty(), "'Carrot' contains 'ar' but must not match: {:?}", names);
    }

    #[test]
    fn test_owned_first_with_stable_order() {
        let candidates = match_ingredients("B", &kitchen());
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Beef", "Butter", "Bacon", "Basil", "Beans", "Broccoli"]);
        assert!(candidates[0].owned && candidates[1].owned);
        assert!(candidates[2..].iter().all(|c| !c.owned));
    }

    #[test]
    fn test_case_insensitive_input() {
        let lower = match_ingredients("bu", &kitchen());
        let upper = match_ingredients("BU", &kitchen());
        assert_eq!(lower, upper);
        assert_eq!(lower[0].availability_label(), "Available");
    }

    #[test]
    fn test_vocabulary_duplicates_are_kept() {
        let snapshot = InventorySnapshot::with_vocabulary(["Salt", "Salt"]);
        assert_eq!(match_ingredients("s", &snapshot).len(), 2);
    }
}
