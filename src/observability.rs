//! Observability module for centralized metrics, tracing, and logging setup.
//!
//! This module provides:
//! - Structured logging with configurable levels and formats
//! - Metrics collection with optional Prometheus export
//! - Span helpers for each kitchen component

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::prelude::*;

use crate::inventory::StorageLocation;
use crate::observability_config::ObservabilityConfig;

/// Initialize the observability stack from environment variables
pub fn init_observability() -> Result<()> {
    let config = ObservabilityConfig::from_env();
    init_observability_with_config(config)
}

/// Initialize the observability stack with custom configuration.
///
/// Metrics export spawns its listener on the current Tokio runtime, so call this
/// from inside one when export is enabled.
pub fn init_observability_with_config(config: ObservabilityConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    init_tracing_with_config(&config)?;

    if config.enable_metrics_export {
        init_metrics_with_config(&config)?;
    } else {
        tracing::info!("Metrics export disabled");
    }

    tracing::info!(
        environment = %config.environment,
        metrics_port = %config.metrics_port,
        metrics_enabled = %config.enable_metrics_export,
        "Observability stack initialized successfully"
    );
    Ok(())
}

/// Initialize structured logging with tracing and configuration
fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("intelli_foods={}", config.log_level).parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper=warn".parse()?);

    if config.use_pretty_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Install the Prometheus recorder and its HTTP listener
fn init_metrics_with_config(config: &ObservabilityConfig) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    tracing::info!(%addr, "Metrics collection initialized");
    Ok(())
}

/// Create a span for inventory operations
pub fn inventory_span(operation: &str, location: Option<StorageLocation>) -> tracing::Span {
    tracing::info_span!(
        "inventory_operation",
        operation = operation,
        location = location.map(|l| l.as_str()),
        component = "inventory"
    )
}

/// Create a span for recipe generation
pub fn recipe_span(generation: u64) -> tracing::Span {
    tracing::info_span!(
        "recipe_generation",
        generation = generation,
        component = "recipe"
    )
}

/// Create a span for session operations
pub fn session_span(operation: &str) -> tracing::Span {
    tracing::info_span!("session_operation", operation = operation, component = "session")
}

/// Record a confirmed or refused storage mutation
pub fn record_storage_mutation(operation: &str, location: StorageLocation, success: bool) {
    metrics::counter!(
        "storage_mutations_total",
        "operation" => operation.to_string(),
        "location" => location.as_str(),
        "result" => if success { "success" } else { "failure" }
    )
    .increment(1);
}

/// Record the outcome of a recipe generation ("success", "failure" or "superseded")
pub fn record_recipe_generation(result: &'static str, duration: Duration) {
    metrics::counter!("recipe_generations_total", "result" => result).increment(1);
    metrics::histogram!("recipe_generation_duration_seconds").record(duration.as_secs_f64());
}

/// Record an HTTP call to the kitchen API
pub fn record_api_request(method: &str, status: u16, duration: Duration) {
    let method = method.to_string();
    let status = status.to_string();
    metrics::counter!("api_requests_total", "method" => method, "status" => status).increment(1);
    metrics::histogram!("api_request_duration_seconds").record(duration.as_secs_f64());
}

/// Gauge of the inventory size after each load or patch
pub fn update_inventory_size(items: usize) {
    metrics::gauge!("inventory_items").set(items as f64);
}
