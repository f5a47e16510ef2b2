//! # Unified Application Configuration
//!
//! This module consolidates the kitchen API client settings and the
//! observability settings into a single configuration object loaded from
//! environment variables (optionally via a `.env` file).

use crate::errors::{AppError, AppResult};
use crate::observability_config::ObservabilityConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Kitchen API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the kitchen web API, without trailing slash
    pub base_url: String,
    /// Raw `Cookie` header value carrying the session, if any
    pub session_cookie: Option<String>,
    /// Timeout applied to every HTTP call, in seconds
    pub http_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            session_cookie: None,
            http_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Timeout as a `Duration`
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Validate API configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::Config("API base URL cannot be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AppError::Config(
                "API base URL must start with 'http://' or 'https://'".to_string(),
            ));
        }

        if let Some(cookie) = &self.session_cookie {
            if cookie.trim().is_empty() {
                return Err(AppError::Config("Session cookie cannot be blank".to_string()));
            }
        }

        if self.http_timeout_secs == 0 {
            return Err(AppError::Config("HTTP timeout cannot be 0".to_string()));
        }

        if self.http_timeout_secs > 300 {
            return Err(AppError::Config(
                "HTTP timeout cannot be greater than 300 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Kitchen API configuration
    pub api: ApiConfig,
    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("KITCHEN_API_URL") {
            config.api.base_url = url.trim_end_matches('/').to_string();
        }
        config.api.session_cookie = env::var("KITCHEN_SESSION_COOKIE").ok();
        config.api.http_timeout_secs = env::var("HTTP_CLIENT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("HTTP_CLIENT_TIMEOUT_SECS must be a valid number".to_string())
            })?;

        config.observability = ObservabilityConfig::from_env();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.api.validate()?;
        self.observability.validate().map_err(AppError::Config)?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: api_url={}, session_cookie={}, http_timeout_secs={}, environment={}, metrics_enabled={}",
            self.api.base_url,
            if self.api.session_cookie.is_some() { "[REDACTED]" } else { "none" },
            self.api.http_timeout_secs,
            self.observability.environment,
            self.observability.enable_metrics_export
        )
    }
}
