//! # Ingredient Matching Tests
//!
//! Ranking properties of the autocomplete and the pantry context built from a
//! selected main ingredient.


use intelli_foods::inventory::{FoodItem, InventorySnapshot, StorageLocation};
use intelli_foods::matcher::match_ingredients;
use intelli_foods::pantry::build_pantry_context;
use intelli_foods::recipe::RecipeRequest;
use std::collections::BTreeSet;
use test_helpers::{flour_and_fish, stocked_kitchen};

#[test]
fn test_flour_ranked_before_fish() {
    let candidates = match_ingredients("f", &flour_and_fish());

    let ranked: Vec<(&str, bool)> = candidates
        .iter()
        .map(|c| (c.name.as_str(), c.owned))
        .collect();
    assert_eq!(ranked, vec![("Flour", true), ("Fish", false)]);
    assert_eq!(candidates[0].availability_label(), "Available");
    assert_eq!(candidates[1].availability_label(), "Unavailable");
}

#[test]
fn test_pantry_empty_when_only_main_is_owned() {
    let pantry = build_pantry_context("Flour", &flour_and_fish());
    assert!(pantry.is_empty());
}

#[test]
fn test_candidates_are_prefix_matches_from_vocabulary() {
    let snapshot = stocked_kitchen();
    for input in ["p", "P", "pe", "Mi", "x", "eggs"] {
        let prefix = input.to_lowercase();
        for candidate in match_ingredients(input, &snapshot) {
            assert!(snapshot.vocabulary.contains(&candidate.name));
            assert!(
                candidate.name.to_lowercase().starts_with(&prefix),
                "{} does not start with {}",
                candidate.name,
                input
            );
        }
    }
}

#[test]
fn test_owned_first_and_vocabulary_order_kept() {
    let mut snapshot =
        InventorySnapshot::with_vocabulary(["Parsley", "Peas", "Pepper", "Pasta", "Plum"]);
    snapshot.apply_add(StorageLocation::Freezer, FoodItem::new("Peas"));
    snapshot.apply_add(StorageLocation::Shelf, FoodItem::new("Pasta"));

    let names: Vec<String> = match_ingredients("p", &snapshot)
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Peas", "Pasta", "Parsley", "Pepper", "Plum"]);
}

#[test]
fn test_owned_flag_ignores_case() {
    let mut snapshot = InventorySnapshot::with_vocabulary(["Milk"]);
    snapshot.apply_add(StorageLocation::Fridge, FoodItem::new("milk"));

    let candidates = match_ingredients("M", &snapshot);
    assert_eq!(candidates.len(), 1);
    assert!(candidates[0].owned);
}

#[test]
fn test_empty_input_and_empty_vocabulary() {
    assert!(match_ingredients("", &stocked_kitchen()).is_empty());
    assert!(match_ingredients("f", &InventorySnapshot::default()).is_empty());
}

#[test]
fn test_pantry_spans_all_locations_and_excludes_main() {
    let pantry = build_pantry_context("MILK", &stocked_kitchen());
    let expected: BTreeSet<String> = ["eggs", "flour", "peas"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(pantry, expected);
}

#[test]
fn test_request_from_selection() {
    let snapshot = stocked_kitchen();

    let request = RecipeRequest::from_selection(Some("Eggs"), &snapshot, true);
    assert_eq!(request.main_ingredients, vec!["Eggs"]);
    assert_eq!(request.pantry_ingredients, vec!["flour", "milk", "peas"]);
    assert!(request.suggest_substitution);

    let request = RecipeRequest::from_selection(None, &snapshot, false);
    assert!(request.main_ingredients.is_empty());
    assert!(request.pantry_ingredients.is_empty());
}
