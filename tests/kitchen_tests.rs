//! # Kitchen Tests
//!
//! End-to-end behaviour of the kitchen against an in-memory backend: session
//! gating, two-phase storage mutations, autocomplete selection and recipe
//! generation.


use intelli_foods::errors::AppError;
use intelli_foods::inventory::{FoodItem, StorageLocation};
use intelli_foods::kitchen::{Kitchen, RecipeDisplay};
use intelli_foods::orchestrator::{GenerationOutcome, RequestState};
use intelli_foods::session::Session;
use std::sync::Arc;
use std::time::Duration;
use test_helpers::{flour_and_fish, pictured_recipe, stocked_kitchen, FakeBackend};

async fn started(backend: FakeBackend) -> (Arc<FakeBackend>, Kitchen<FakeBackend>) {
    let backend = Arc::new(backend);
    let kitchen = Kitchen::new(Arc::clone(&backend));
    kitchen.start().await.unwrap();
    (backend, kitchen)
}

#[tokio::test]
async fn test_start_loads_inventory_even_when_signed_out() {
    let (_, kitchen) = started(FakeBackend::new(stocked_kitchen())).await;

    assert!(!kitchen.session().is_logged_in());
    assert_eq!(kitchen.store().snapshot().item_count(), 4);
}

#[tokio::test]
async fn test_flour_and_fish_selection() {
    let (_, kitchen) = started(FakeBackend::new(flour_and_fish()).signed_in()).await;

    let candidates = kitchen.set_input("f");
    assert!(kitchen.is_dropdown_open());
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].name, "Flour");
    assert!(candidates[0].owned);
    assert_eq!(candidates[1].name, "Fish");
    assert!(!candidates[1].owned);

    kitchen.select_ingredient("Flour").unwrap();
    assert_eq!(kitchen.main_ingredient().as_deref(), Some("Flour"));
    assert_eq!(kitchen.input(), "Flour");
    assert!(!kitchen.is_dropdown_open());
    assert!(kitchen.pantry_context().is_empty());
}

#[tokio::test]
async fn test_clearing_input_closes_dropdown() {
    let (_, kitchen) = started(FakeBackend::new(flour_and_fish())).await;

    kitchen.set_input("fi");
    assert!(kitchen.is_dropdown_open());

    assert!(kitchen.set_input("").is_empty());
    assert!(!kitchen.is_dropdown_open());
}

#[tokio::test]
async fn test_select_requires_a_current_candidate() {
    let (_, kitchen) = started(FakeBackend::new(flour_and_fish())).await;

    kitchen.set_input("fl");
    let err = kitchen.select_ingredient("Fish").unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(kitchen.main_ingredient(), None);
}

#[tokio::test]
async fn test_signed_out_actions_do_not_reach_backend() {
    let (backend, kitchen) = started(FakeBackend::new(stocked_kitchen())).await;
    kitchen.open_storage(StorageLocation::Fridge);

    assert_eq!(
        kitchen.add_food(FoodItem::new("Butter")).await,
        Err(AppError::AuthRequired)
    );
    assert_eq!(kitchen.delete_food(0).await, Err(AppError::AuthRequired));
    assert_eq!(kitchen.generate_recipe().await, Err(AppError::AuthRequired));
    assert_eq!(kitchen.log_out().await, Err(AppError::AuthRequired));

    assert_eq!(backend.mutation_calls(), 0);
    assert!(backend.recipe_requests().is_empty());
    assert_eq!(kitchen.request_state(), RequestState::Idle);
}

#[tokio::test]
async fn test_mutation_needs_open_storage() {
    let (backend, kitchen) = started(FakeBackend::new(stocked_kitchen()).signed_in()).await;

    let err = kitchen.add_food(FoodItem::new("Butter")).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(backend.mutation_calls(), 0);
}

#[tokio::test]
async fn test_invalid_name_rejected_before_network() {
    let (backend, kitchen) = started(FakeBackend::new(stocked_kitchen()).signed_in()).await;
    kitchen.open_storage(StorageLocation::Shelf);

    let err = kitchen.add_food(FoodItem::new("   ")).await.unwrap_err();
    assert_eq!(
        err,
        AppError::Validation("Please fill in the food name".to_string())
    );

    let err = kitchen
        .edit_food(0, FoodItem::new("x".repeat(101)))
        .await
        .unwrap_err();
    assert_eq!(err, AppError::Validation("Food name is too long".to_string()));

    assert_eq!(backend.mutation_calls(), 0);
    assert_eq!(kitchen.working_copy(), vec![FoodItem::new("Flour")]);
}

#[tokio::test]
async fn test_confirmed_mutations_patch_snapshot() {
    let (_, kitchen) = started(FakeBackend::new(stocked_kitchen()).signed_in()).await;
    kitchen.open_storage(StorageLocation::Fridge);

    kitchen.add_food(FoodItem::new("Butter")).await.unwrap();
    assert_eq!(
        kitchen.working_copy(),
        vec![
            FoodItem::new("Milk"),
            FoodItem::new("Eggs"),
            FoodItem::new("Butter")
        ]
    );

    kitchen.edit_food(0, FoodItem::new("Oat Milk")).await.unwrap();
    kitchen.delete_food(1).await.unwrap();

    let expected = vec![FoodItem::new("Oat Milk"), FoodItem::new("Butter")];
    assert_eq!(kitchen.working_copy(), expected);
    assert_eq!(kitchen.store().items(StorageLocation::Fridge), expected);
    assert_eq!(kitchen.store().snapshot().item_count(), 4);
}

#[tokio::test]
async fn test_failed_mutation_leaves_snapshot_untouched() {
    let (backend, kitchen) = started(FakeBackend::new(stocked_kitchen()).signed_in()).await;
    kitchen.open_storage(StorageLocation::Fridge);
    let before = kitchen.store().snapshot().clone();

    backend.fail_mutations(AppError::NonSuccessStatus(500));

    assert_eq!(
        kitchen.add_food(FoodItem::new("Butter")).await,
        Err(AppError::NonSuccessStatus(500))
    );
    assert_eq!(
        kitchen.edit_food(1, FoodItem::new("Duck Eggs")).await,
        Err(AppError::NonSuccessStatus(500))
    );
    assert_eq!(
        kitchen.delete_food(0).await,
        Err(AppError::NonSuccessStatus(500))
    );

    assert_eq!(backend.mutation_calls(), 3);
    assert_eq!(*kitchen.store().snapshot(), before);
    assert_eq!(kitchen.working_copy(), before.fridge);
}

#[tokio::test]
async fn test_out_of_range_index_not_sent() {
    let (backend, kitchen) = started(FakeBackend::new(stocked_kitchen()).signed_in()).await;
    kitchen.open_storage(StorageLocation::Freezer);

    assert_eq!(
        kitchen.delete_food(1).await,
        Err(AppError::IndexOutOfRange { index: 1, len: 1 })
    );
    assert_eq!(backend.mutation_calls(), 0);
}

#[tokio::test]
async fn test_mutations_queue_per_location() {
    let backend = FakeBackend::new(stocked_kitchen())
        .signed_in()
        .with_mutation_delay(Duration::from_millis(20));
    let (backend, kitchen) = started(backend).await;
    let session = kitchen.session();
    let store = kitchen.store();

    let (first, second, shelf) = tokio::join!(
        store.add(&session, StorageLocation::Fridge, FoodItem::new("Butter")),
        store.delete(&session, StorageLocation::Fridge, 0),
        store.add(&session, StorageLocation::Shelf, FoodItem::new("Rice")),
    );
    first.unwrap();
    second.unwrap();
    shelf.unwrap();

    let fridge_events: Vec<String> = backend
        .events()
        .into_iter()
        .filter(|e| e.ends_with(":fridge"))
        .collect();
    assert_eq!(
        fridge_events,
        vec![
            "start:add:fridge",
            "end:add:fridge",
            "start:delete:fridge",
            "end:delete:fridge"
        ]
    );

    // Shelf did not wait behind the fridge queue
    let events = backend.events();
    let shelf_start = events.iter().position(|e| e == "start:add:shelf").unwrap();
    let fridge_end = events.iter().position(|e| e == "end:add:fridge").unwrap();
    assert!(shelf_start < fridge_end);

    assert_eq!(
        store.items(StorageLocation::Fridge),
        vec![FoodItem::new("Eggs"), FoodItem::new("Butter")]
    );
}

#[tokio::test]
async fn test_generate_sends_selection() {
    let (backend, kitchen) = started(FakeBackend::new(stocked_kitchen()).signed_in()).await;

    kitchen.set_input("mi");
    kitchen.select_ingredient("Milk").unwrap();
    assert!(kitchen.toggle_suggest_substitution());

    let outcome = kitchen.generate_recipe().await.unwrap();
    assert_eq!(outcome, GenerationOutcome::Completed(pictured_recipe("Pancakes")));

    let requests = backend.recipe_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].main_ingredients, vec!["Milk"]);
    assert_eq!(requests[0].pantry_ingredients, vec!["eggs", "flour", "peas"]);
    assert!(requests[0].suggest_substitution);

    assert_eq!(
        kitchen.display(),
        RecipeDisplay::Recipe(pictured_recipe("Pancakes"))
    );
}

#[tokio::test]
async fn test_generate_without_main_ingredient_sends_empty_lists() {
    let (backend, kitchen) = started(FakeBackend::new(stocked_kitchen()).signed_in()).await;

    kitchen.generate_recipe().await.unwrap();

    let requests = backend.recipe_requests();
    assert!(requests[0].main_ingredients.is_empty());
    assert!(requests[0].pantry_ingredients.is_empty());
    assert!(!requests[0].suggest_substitution);
}

#[tokio::test]
async fn test_recipe_without_image_shows_placeholder() {
    let (backend, kitchen) = started(FakeBackend::new(stocked_kitchen()).signed_in()).await;
    backend.set_recipe_result(Ok(Default::default()));

    kitchen.generate_recipe().await.unwrap();

    assert!(kitchen.request_state().recipe().is_some());
    assert_eq!(kitchen.display(), RecipeDisplay::Placeholder);
}

#[tokio::test]
async fn test_unauthorized_generation_drops_session() {
    let (backend, kitchen) = started(FakeBackend::new(stocked_kitchen()).signed_in()).await;
    backend.set_recipe_result(Err(AppError::AuthRequired));

    let outcome = kitchen.generate_recipe().await.unwrap();

    assert_eq!(outcome, GenerationOutcome::Failed(AppError::AuthRequired));
    assert_eq!(kitchen.session(), Session::anonymous());
}

#[tokio::test]
async fn test_log_out() {
    let (backend, kitchen) = started(FakeBackend::new(stocked_kitchen()).signed_in()).await;
    assert!(kitchen.session().is_logged_in());

    kitchen.log_out().await.unwrap();

    assert!(backend.was_signed_out());
    assert!(!kitchen.session().is_logged_in());
}
