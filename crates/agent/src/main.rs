//! Monitor Agent - host telemetry monitoring agent
//!
//! Samples host metrics on a fixed tick, evaluates threshold and forecast
//! alerts, and exposes health and Prometheus endpoints.

use anyhow::Result;
use monitor_lib::{
    health::{components, HealthRegistry},
    monitor::{LogReporter, MonitorLoopBuilder},
    observability::MonitorMetrics,
    sampler::SystemSampler,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!(version = AGENT_VERSION, "Starting monitor-agent");

    // Load configuration
    let mut config = config::AgentConfig::load()?;
    info!(
        interval_ms = config.monitor.tick_interval_ms,
        threshold = config.monitor.alert_threshold,
        prediction = config.monitor.prediction_enabled,
        "Agent configured"
    );

    // External sources need a fetch collaborator this binary does not ship;
    // embedders wire one through MonitorLoopBuilder::source_client.
    if !config.monitor.sources.is_empty() {
        warn!(
            sources = config.monitor.sources.len(),
            "No source client available in this binary, ignoring configured sources"
        );
        config.monitor.sources.clear();
    }

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::SAMPLER).await;
    health_registry.register(components::PREDICTOR).await;
    health_registry.register(components::MONITOR_LOOP).await;

    // Initialize metrics
    let metrics = MonitorMetrics::new();

    // Assemble the monitor loop
    let monitor = MonitorLoopBuilder::new(config.monitor.clone())
        .sampler(Arc::new(SystemSampler::new()))
        .reporter(Arc::new(LogReporter::new()))
        .health(health_registry.clone())
        .build()?;

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(health_registry.clone(), metrics));

    // Mark agent as ready after initialization
    health_registry.set_ready(true).await;

    // Start health and metrics server
    let _api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Run the loop until SIGINT
    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);
    let loop_handle = tokio::spawn(monitor.run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("SIGINT received, shutting down");
    let _ = shutdown_tx.send(());

    let final_state = loop_handle.await?;
    info!(?final_state, "Monitor loop stopped");

    Ok(())
}
