//! Core library for the telemetry monitoring agent
//!
//! This crate provides:
//! - Host metric sampling (CPU, memory, traffic)
//! - Bounded per-metric sample history
//! - Deterministic threshold and forecast evaluation
//! - Pluggable prediction (linear extrapolation or external collaborator)
//! - Concurrent external source polling with debounced alerts
//! - The monitoring loop tying these together
//! - Health checks and observability

pub mod config;
pub mod error;
pub mod evaluate;
pub mod health;
pub mod history;
pub mod models;
pub mod monitor;
pub mod observability;
pub mod predictor;
pub mod sampler;
pub mod sources;

pub use config::MonitorConfig;
pub use error::MonitorError;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use monitor::{LogReporter, LoopState, MonitorLoop, MonitorLoopBuilder, Reporter};
pub use observability::MonitorMetrics;
