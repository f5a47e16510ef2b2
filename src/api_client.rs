//! # Kitchen API Client
//!
//! HTTP implementation of the session, inventory and recipe service ports on
//! top of `reqwest`. Every call carries the configured timeout; a 401/403
//! answer becomes [`AppError::AuthRequired`], any other non-success status
//! becomes [`AppError::NonSuccessStatus`].
//!
//! ## Endpoints
//!
//! | Operation        | Method | Path                     | Body                      |
//! |------------------|--------|--------------------------|---------------------------|
//! | session status   | GET    | `/api/auth/session`      |                           |
//! | sign out         | DELETE | `/api/auth/signout`      |                           |
//! | load inventory   | GET    | `/api/home/fridge-data`  |                           |
//! | add food         | POST   | `/api/home/{location}`   | `Food`                    |
//! | edit food        | PUT    | `/api/home/{location}`   | `{index, updatedItem}`    |
//! | delete food      | DELETE | `/api/home/{location}`   | `{index}`                 |
//! | generate recipe  | POST   | `/api/home/recipes`      | recipe request            |

use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::errors::{error_logging, AppError, AppResult};
use crate::inventory::{FoodItem, InventorySnapshot, StorageLocation};
use crate::observability::record_api_request;
use crate::recipe::{Recipe, RecipeRequest};
use crate::services::{InventoryService, RecipeService, SessionService};

const SESSION_PATH: &str = "/api/auth/session";
const SIGN_OUT_PATH: &str = "/api/auth/signout";
const FRIDGE_DATA_PATH: &str = "/api/home/fridge-data";
const RECIPES_PATH: &str = "/api/home/recipes";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionStatus {
    #[serde(default)]
    is_logged_in: bool,
}

#[derive(Debug, Serialize)]
struct DeletePayload {
    index: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EditPayload<'a> {
    index: usize,
    updated_item: &'a FoodItem,
}

/// HTTP client for the kitchen web API
#[derive(Debug, Clone)]
pub struct KitchenApiClient {
    http_client: Client,
    base_url: String,
}

impl KitchenApiClient {
    /// Create a client from validated API configuration
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie.trim())
                .map_err(|e| AppError::Config(format!("Invalid session cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let http_client = Client::builder()
            .timeout(config.http_timeout())
            .user_agent(concat!("intelli-foods/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn storage_path(location: StorageLocation) -> String {
        format!("/api/home/{}", location.as_str())
    }

    /// Send a request, recording metrics and mapping transport failures
    async fn send(
        &self,
        request: RequestBuilder,
        method: &'static str,
        path: &str,
    ) -> AppResult<Response> {
        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            let err = AppError::from(e);
            error_logging::log_network_error(&err, method, Some(path));
            err
        })?;

        let status = response.status().as_u16();
        record_api_request(method, status, started.elapsed());
        debug!(method, path, status, elapsed_ms = %started.elapsed().as_millis(), "Kitchen API call completed");
        Ok(response)
    }

    /// Like `send`, but turn a non-success status into an error
    async fn send_checked(
        &self,
        request: RequestBuilder,
        method: &'static str,
        path: &str,
    ) -> AppResult<Response> {
        let response = self.send(request, method, path).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                method,
                path,
                status = status.as_u16(),
                body = %body,
                "Kitchen API returned an error status"
            );
            return Err(AppError::from_status(status.as_u16()));
        }
        Ok(response)
    }
}

impl SessionService for KitchenApiClient {
    async fn check_session(&self) -> AppResult<bool> {
        let request = self.http_client.get(self.url(SESSION_PATH));
        let response = self.send(request, "GET", SESSION_PATH).await?;

        // Any non-success answer means "not signed in"
        if !response.status().is_success() {
            return Ok(false);
        }

        let status: SessionStatus = response.json().await?;
        Ok(status.is_logged_in)
    }

    async fn sign_out(&self) -> AppResult<()> {
        let request = self.http_client.delete(self.url(SIGN_OUT_PATH));
        self.send_checked(request, "DELETE", SIGN_OUT_PATH).await?;
        Ok(())
    }
}

impl InventoryService for KitchenApiClient {
    async fn fetch_inventory(&self) -> AppResult<InventorySnapshot> {
        let request = self.http_client.get(self.url(FRIDGE_DATA_PATH));
        let response = self.send_checked(request, "GET", FRIDGE_DATA_PATH).await?;
        let snapshot: InventorySnapshot = response.json().await?;
        Ok(snapshot)
    }

    async fn add_food(&self, location: StorageLocation, item: FoodItem) -> AppResult<()> {
        let path = Self::storage_path(location);
        let request = self.http_client.post(self.url(&path)).json(&item);
        self.send_checked(request, "POST", &path).await?;
        Ok(())
    }

    async fn edit_food(
        &self,
        location: StorageLocation,
        index: usize,
        item: FoodItem,
    ) -> AppResult<()> {
        let path = Self::storage_path(location);
        let payload = EditPayload {
            index,
            updated_item: &item,
        };
        let request = self.http_client.put(self.url(&path)).json(&payload);
        self.send_checked(request, "PUT", &path).await?;
        Ok(())
    }

    async fn delete_food(&self, location: StorageLocation, index: usize) -> AppResult<()> {
        let path = Self::storage_path(location);
        let request = self
            .http_client
            .delete(self.url(&path))
            .json(&DeletePayload { index });
        self.send_checked(request, "DELETE", &path).await?;
        Ok(())
    }
}

impl RecipeService for KitchenApiClient {
    async fn generate_recipe(&self, request: RecipeRequest) -> AppResult<Recipe> {
        let http_request = self.http_client.post(self.url(RECIPES_PATH)).json(&request);
        let response = self.send_checked(http_request, "POST", RECIPES_PATH).await?;
        let body = response.text().await?;
        Recipe::from_response_body(&body)
    }
}
