//! # Kitchen
//!
//! Page-level state tying the components together: the explicit session, the
//! shared inventory, the storage location currently open for editing, the
//! main-ingredient search box and the recipe request cycle.
//!
//! ```text
//! keystroke ──► set_input ──► match_ingredients(snapshot) ──► dropdown
//! select_ingredient ──► main ingredient ──► pantry context ─┐
//! substitution toggle ─────────────────────────────────────┴► generate_recipe
//! ```

use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::{AppError, AppResult};
use crate::inventory::{FoodItem, StorageLocation};
use crate::matcher::{match_ingredients, IngredientCandidate};
use crate::orchestrator::{GenerationOutcome, RecipeOrchestrator, RequestState};
use crate::pantry::build_pantry_context;
use crate::recipe::{Recipe, RecipeRequest};
use crate::services::{InventoryService, RecipeService, SessionService};
use crate::session::{establish_session, sign_out, Session};
use crate::storage::InventoryStore;

/// Text shown when there is no recipe to display
pub const NO_RECIPE_MESSAGE: &str = "No recipe generated yet.";

/// What the recipe panel should render
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeDisplay {
    Loading,
    Placeholder,
    Recipe(Recipe),
}

impl RecipeDisplay {
    /// A recipe is only shown once it has an image; anything else falls back to the placeholder
    pub fn from_state(state: &RequestState) -> Self {
        match state {
            RequestState::Loading => RecipeDisplay::Loading,
            RequestState::Succeeded(recipe) if recipe.has_image() => {
                RecipeDisplay::Recipe(recipe.clone())
            }
            _ => RecipeDisplay::Placeholder,
        }
    }
}

#[derive(Debug, Default)]
struct SelectionState {
    active_storage: Option<StorageLocation>,
    working_copy: Vec<FoodItem>,
    input: String,
    dropdown_open: bool,
    main_ingredient: Option<String>,
    suggest_substitution: bool,
}

/// The kitchen inventory and recipe generator, backed by one API client
pub struct Kitchen<B> {
    backend: Arc<B>,
    session: RwLock<Session>,
    store: InventoryStore<B>,
    orchestrator: RecipeOrchestrator<B>,
    selection: Mutex<SelectionState>,
}

impl<B> Kitchen<B>
where
    B: SessionService + InventoryService + RecipeService,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            store: InventoryStore::new(Arc::clone(&backend)),
            orchestrator: RecipeOrchestrator::new(Arc::clone(&backend)),
            backend,
            session: RwLock::new(Session::anonymous()),
            selection: Mutex::new(SelectionState::default()),
        }
    }

    /// Check the session and load the inventory.
    ///
    /// The inventory is loaded whether or not the user is signed in; a failed
    /// load leaves the kitchen empty and is returned to the caller.
    pub async fn start(&self) -> AppResult<()> {
        let session = establish_session(self.backend.as_ref()).await;
        *self.session.write() = session;
        self.store.load().await
    }

    pub fn session(&self) -> Session {
        *self.session.read()
    }

    /// Replace the session, e.g. after an external sign-in
    pub fn set_session(&self, session: Session) {
        *self.session.write() = session;
    }

    /// Sign out. Fails with `AuthRequired` when there is no session to end.
    pub async fn log_out(&self) -> AppResult<()> {
        let session = self.session();
        session.require_authorized()?;
        let session = sign_out(self.backend.as_ref(), session).await?;
        *self.session.write() = session;
        Ok(())
    }

    /// Shared inventory store
    pub fn store(&self) -> &InventoryStore<B> {
        &self.store
    }

    /// Open a storage location for editing and return its items
    pub fn open_storage(&self, location: StorageLocation) -> Vec<FoodItem> {
        let items = self.store.items(location);
        let mut selection = self.selection.lock();
        selection.active_storage = Some(location);
        selection.working_copy = items.clone();
        items
    }

    pub fn close_storage(&self) {
        let mut selection = self.selection.lock();
        selection.active_storage = None;
        selection.working_copy.clear();
    }

    pub fn active_storage(&self) -> Option<StorageLocation> {
        self.selection.lock().active_storage
    }

    /// Items of the open storage location as last synchronized
    pub fn working_copy(&self) -> Vec<FoodItem> {
        self.selection.lock().working_copy.clone()
    }

    fn open_location(&self) -> AppResult<StorageLocation> {
        self.active_storage()
            .ok_or_else(|| AppError::Validation("No storage location is open".to_string()))
    }

    fn refresh_working_copy(&self, location: StorageLocation) {
        let items = self.store.items(location);
        let mut selection = self.selection.lock();
        if selection.active_storage == Some(location) {
            selection.working_copy = items;
        }
    }

    /// Add `item` to the open storage location
    pub async fn add_food(&self, item: FoodItem) -> AppResult<()> {
        let session = self.session();
        session.require_authorized()?;
        let location = self.open_location()?;
        self.store.add(&session, location, item).await?;
        self.refresh_working_copy(location);
        Ok(())
    }

    /// Replace the item at `index` of the open storage location
    pub async fn edit_food(&self, index: usize, item: FoodItem) -> AppResult<()> {
        let session = self.session();
        session.require_authorized()?;
        let location = self.open_location()?;
        self.store.edit(&session, location, index, item).await?;
        self.refresh_working_copy(location);
        Ok(())
    }

    /// Remove the item at `index` of the open storage location
    pub async fn delete_food(&self, index: usize) -> AppResult<()> {
        let session = self.session();
        session.require_authorized()?;
        let location = self.open_location()?;
        self.store.delete(&session, location, index).await?;
        self.refresh_working_copy(location);
        Ok(())
    }

    /// Update the search box and return the new suggestions
    pub fn set_input(&self, text: &str) -> Vec<IngredientCandidate> {
        {
            let mut selection = self.selection.lock();
            selection.input = text.to_string();
            selection.dropdown_open = !text.is_empty();
        }
        self.candidates()
    }

    pub fn input(&self) -> String {
        self.selection.lock().input.clone()
    }

    /// Suggestions for the current search text
    pub fn candidates(&self) -> Vec<IngredientCandidate> {
        let input = self.input();
        match_ingredients(&input, &self.store.snapshot())
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.selection.lock().dropdown_open
    }

    /// Choose `name` from the current suggestions as the main ingredient.
    ///
    /// The search text becomes `name` and the dropdown closes.
    pub fn select_ingredient(&self, name: &str) -> AppResult<()> {
        if !self.candidates().iter().any(|candidate| candidate.name == name) {
            return Err(AppError::Validation(format!(
                "'{}' is not one of the suggested ingredients",
                name
            )));
        }

        let mut selection = self.selection.lock();
        selection.main_ingredient = Some(name.to_string());
        selection.input = name.to_string();
        selection.dropdown_open = false;
        info!(main_ingredient = %name, "Main ingredient selected");
        Ok(())
    }

    pub fn main_ingredient(&self) -> Option<String> {
        self.selection.lock().main_ingredient.clone()
    }

    /// Owned ingredients other than the main one; empty until a main ingredient is chosen
    pub fn pantry_context(&self) -> BTreeSet<String> {
        match self.main_ingredient() {
            Some(main) => build_pantry_context(&main, &self.store.snapshot()),
            None => BTreeSet::new(),
        }
    }

    pub fn set_suggest_substitution(&self, enabled: bool) {
        self.selection.lock().suggest_substitution = enabled;
    }

    /// Flip the substitution flag and return its new value
    pub fn toggle_suggest_substitution(&self) -> bool {
        let mut selection = self.selection.lock();
        selection.suggest_substitution = !selection.suggest_substitution;
        selection.suggest_substitution
    }

    pub fn suggest_substitution(&self) -> bool {
        self.selection.lock().suggest_substitution
    }

    /// Payload for the current selection
    pub fn recipe_request(&self) -> RecipeRequest {
        let (main, suggest) = {
            let selection = self.selection.lock();
            (selection.main_ingredient.clone(), selection.suggest_substitution)
        };
        RecipeRequest::from_selection(main.as_deref(), &self.store.snapshot(), suggest)
    }

    /// Request a recipe for the current selection.
    ///
    /// Without a session nothing is sent and `AuthRequired` is returned. If the
    /// backend rejects our credentials the session is dropped so the next
    /// authorized action asks for a sign-in.
    pub async fn generate_recipe(&self) -> AppResult<GenerationOutcome> {
        self.session().require_authorized()?;

        let request = self.recipe_request();
        let outcome = self.orchestrator.generate(request).await;

        if let GenerationOutcome::Failed(AppError::AuthRequired) = &outcome {
            warn!("Recipe service rejected the session");
            *self.session.write() = Session::anonymous();
        }
        Ok(outcome)
    }

    pub fn request_state(&self) -> RequestState {
        self.orchestrator.state()
    }

    /// What the recipe panel should render right now
    pub fn display(&self) -> RecipeDisplay {
        RecipeDisplay::from_state(&self.orchestrator.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rules() {
        assert_eq!(RecipeDisplay::from_state(&RequestState::Idle), RecipeDisplay::Placeholder);
        assert_eq!(RecipeDisplay::from_state(&RequestState::Loading), RecipeDisplay::Loading);
        assert_eq!(
            RecipeDisplay::from_state(&RequestState::Failed(AppError::Timeout)),
            RecipeDisplay::Placeholder
        );

        let imageless = Recipe::default();
        assert_eq!(
            RecipeDisplay::from_state(&RequestState::Succeeded(imageless)),
            RecipeDisplay::Placeholder
        );

        let pictured = Recipe {
            image_url: "https://img.example/soup.png".to_string(),
            ..Recipe::default()
        };
        assert_eq!(
            RecipeDisplay::from_state(&RequestState::Succeeded(pictured.clone())),
            RecipeDisplay::Recipe(pictured)
        );
    }
}
