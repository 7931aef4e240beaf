//! Error types for the monitoring agent
//!
//! Every kind except `LoopFatal` is degraded-not-fatal: it is recovered
//! within the tick that raised it and surfaced as a diagnostic alert.

use crate::models::Metric;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// Sampler could not read a value for one metric
    #[error("metric {metric} unavailable: {reason}")]
    MetricUnavailable { metric: Metric, reason: String },

    /// Insufficient history or collaborator failure during prediction
    #[error("prediction unavailable for {metric}: {reason}")]
    PredictionUnavailable { metric: Metric, reason: String },

    /// Timeout or error polling an external source
    #[error("source {source_id} unreachable: {reason}")]
    SourceUnreachable { source_id: String, reason: String },

    /// Internal invariant violation; the only kind that stops the loop
    #[error("fatal loop error: {0}")]
    LoopFatal(String),
}

impl MonitorError {
    /// Whether the loop must stop after surfacing this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, MonitorError::LoopFatal(_))
    }
}
