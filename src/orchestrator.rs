//! # Recipe Request Orchestrator
//!
//! Drives the request/response cycle with the recipe-generation service and
//! owns the [`RequestState`] the display layer renders.
//!
//! ## Latest Call Wins
//!
//! ```text
//! generate(A) ──► generation 1 ──► Loading
//! generate(B) ──► generation 2 ──► Loading
//!     B resolves ──► latest == 2 ──► Succeeded(B) / Failed
//!     A resolves ──► latest != 1 ──► dropped (Superseded)
//! ```
//!
//! Every call takes a fresh generation number before it suspends. When its
//! response arrives the result is applied only if that number is still the
//! latest one issued; otherwise the response is dropped. Superseded requests
//! are not aborted on the network.
//!
//! ## Failure Policy
//!
//! Non-success status, transport failure, timeout and unauthorized answers all
//! move the state to `Failed`. The previous recipe is discarded and nothing is
//! retried.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, Instrument};

use crate::errors::{error_logging, AppError};
use crate::observability::{recipe_span, record_recipe_generation};
use crate::recipe::{Recipe, RecipeRequest};
use crate::services::RecipeService;

/// Lifecycle of the current recipe request
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(Recipe),
    Failed(AppError),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    /// The recipe currently held, if the last request succeeded
    pub fn recipe(&self) -> Option<&Recipe> {
        match self {
            RequestState::Succeeded(recipe) => Some(recipe),
            _ => None,
        }
    }
}

/// What happened to one `generate` call
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The recipe was applied to the shared state
    Completed(Recipe),
    /// The request failed and the state moved to `Failed`
    Failed(AppError),
    /// A newer call started first; this result was dropped
    Superseded,
}

#[derive(Debug, Default)]
struct OrchestratorState {
    latest_generation: u64,
    request_state: RequestState,
}

/// Issues recipe requests and applies only the most recent result
pub struct RecipeOrchestrator<R> {
    service: Arc<R>,
    state: Mutex<OrchestratorState>,
}

impl<R: RecipeService> RecipeOrchestrator<R> {
    pub fn new(service: Arc<R>) -> Self {
        Self {
            service,
            state: Mutex::new(OrchestratorState::default()),
        }
    }

    /// Snapshot of the current request state
    pub fn state(&self) -> RequestState {
        self.state.lock().request_state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().request_state.is_loading()
    }

    /// Number of the most recently issued request
    pub fn latest_generation(&self) -> u64 {
        self.state.lock().latest_generation
    }

    /// Send `request` and apply its result unless a newer call superseded it
    pub async fn generate(&self, request: RecipeRequest) -> GenerationOutcome {
        let generation = {
            let mut state = self.state.lock();
            state.latest_generation += 1;
            state.request_state = RequestState::Loading;
            state.latest_generation
        };

        let main_ingredient = request.main_ingredient().map(str::to_string);
        let pantry_size = request.pantry_ingredients.len();
        let started = Instant::now();

        let result = self
            .service
            .generate_recipe(request)
            .instrument(recipe_span(generation))
            .await;

        let mut state = self.state.lock();
        if state.latest_generation != generation {
            debug!(
                generation,
                latest = state.latest_generation,
                "Dropping superseded recipe response"
            );
            record_recipe_generation("superseded", started.elapsed());
            return GenerationOutcome::Superseded;
        }

        match result {
            Ok(recipe) => {
                info!(
                    generation,
                    title = %recipe.title,
                    steps = recipe.steps.len(),
                    "Recipe generated"
                );
                record_recipe_generation("success", started.elapsed());
                state.request_state = RequestState::Succeeded(recipe.clone());
                GenerationOutcome::Completed(recipe)
            }
            Err(err) => {
                error_logging::log_recipe_error(
                    &err,
                    generation,
                    main_ingredient.as_deref(),
                    pantry_size,
                );
                record_recipe_generation("failure", started.elapsed());
                state.request_state = RequestState::Failed(err.clone());
                GenerationOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppResult;
    use std::collections::BTreeSet;

    struct EchoService;

    impl RecipeService for EchoService {
        async fn generate_recipe(&self, request: RecipeRequest) -> AppResult<Recipe> {
            match request.main_ingredient() {
                Some("error") => Err(AppError::NonSuccessStatus(500)),
                Some(main) => Ok(Recipe {
                    title: format!("{} surprise", main),
                    ..Recipe::default()
                }),
                None => Ok(Recipe::default()),
            }
        }
    }

    fn request(main: &str) -> RecipeRequest {
        RecipeRequest::new(Some(main), &BTreeSet::new(), false)
    }

    #[tokio::test]
    async fn test_success_then_failure_clears_recipe() {
        let orchestrator = RecipeOrchestrator::new(Arc::new(EchoService));
        assert_eq!(orchestrator.state(), RequestState::Idle);

        let outcome = orchestrator.generate(request("Leek")).await;
        assert!(matches!(outcome, GenerationOutcome::Completed(_)));
        assert_eq!(
            orchestrator.state().recipe().map(|r| r.title.as_str()),
            Some("Leek surprise")
        );

        let outcome = orchestrator.generate(request("error")).await;
        assert_eq!(outcome, GenerationOutcome::Failed(AppError::NonSuccessStatus(500)));
        assert_eq!(
            orchestrator.state(),
            RequestState::Failed(AppError::NonSuccessStatus(500))
        );
        assert!(orchestrator.state().recipe().is_none());
        assert_eq!(orchestrator.latest_generation(), 2);
    }

    #[tokio::test]
    async fn test_not_loading_after_completion() {
        let orchestrator = RecipeOrchestrator::new(Arc::new(EchoService));
        orchestrator.generate(request("Corn")).await;
        assert!(!orchestrator.is_loading());
    }
}
