//! # Intelli Foods
//!
//! Kitchen inventory and recipe suggestion core. Tracks food across three
//! storage locations (shelf, fridge, freezer), suggests a main ingredient as
//! the user types, and asks a recipe-generation service for a recipe built
//! around that ingredient and the rest of the pantry.

pub mod api_client;
pub mod config;
pub mod errors;
pub mod inventory;
pub mod kitchen;
pub mod matcher;
pub mod observability;
pub mod observability_config;
pub mod orchestrator;
pub mod pantry;
pub mod recipe;
pub mod services;
pub mod session;
pub mod storage;
pub mod validation;

// Re-export types for easier access
pub use api_client::KitchenApiClient;
pub use config::{ApiConfig, AppConfig};
pub use errors::{AppError, AppResult};
pub use inventory::{FoodItem, InventorySnapshot, StorageLocation};
pub use kitchen::{Kitchen, RecipeDisplay};
pub use matcher::{match_ingredients, IngredientCandidate};
pub use orchestrator::{GenerationOutcome, RecipeOrchestrator, RequestState};
pub use pantry::build_pantry_context;
pub use recipe::{Recipe, RecipeRequest};
pub use session::Session;
pub use storage::{InventoryStore, PendingMutation};
