//! # External Service Ports
//!
//! Contracts for the collaborators the kitchen core talks to. The production
//! implementation is [`crate::api_client::KitchenApiClient`]; tests supply
//! in-memory fakes.

use std::future::Future;

use crate::errors::AppResult;
use crate::inventory::{FoodItem, InventorySnapshot, StorageLocation};
use crate::recipe::{Recipe, RecipeRequest};

/// Session status and sign-out
pub trait SessionService: Send + Sync {
    /// Whether the backend considers the current session signed in
    fn check_session(&self) -> impl Future<Output = AppResult<bool>> + Send;

    /// End the current session
    fn sign_out(&self) -> impl Future<Output = AppResult<()>> + Send;
}

/// Inventory load and positional storage mutations.
///
/// Mutations report success or failure only; the backend never echoes the
/// stored item back.
pub trait InventoryService: Send + Sync {
    fn fetch_inventory(&self) -> impl Future<Output = AppResult<InventorySnapshot>> + Send;

    fn add_food(
        &self,
        location: StorageLocation,
        item: FoodItem,
    ) -> impl Future<Output = AppResult<()>> + Send;

    fn edit_food(
        &self,
        location: StorageLocation,
        index: usize,
        item: FoodItem,
    ) -> impl Future<Output = AppResult<()>> + Send;

    fn delete_food(
        &self,
        location: StorageLocation,
        index: usize,
    ) -> impl Future<Output = AppResult<()>> + Send;
}

/// Opaque recipe generator
pub trait RecipeService: Send + Sync {
    fn generate_recipe(
        &self,
        request: RecipeRequest,
    ) -> impl Future<Output = AppResult<Recipe>> + Send;
}
