//! Core data models for the monitoring agent

use serde::{Deserialize, Serialize};

/// Host metrics tracked by the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cpu,
    Memory,
    Traffic,
}

impl Metric {
    /// All metrics, in evaluation order
    pub const ALL: [Metric; 3] = [Metric::Cpu, Metric::Memory, Metric::Traffic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cpu => "cpu",
            Metric::Memory => "memory",
            Metric::Traffic => "traffic",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single metric reading taken at one instant
///
/// `available = false` marks the unavailable sentinel substituted when a read
/// fails; the value is NaN in that case so it can never satisfy a threshold
/// comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sample {
    pub metric: Metric,
    pub value: f64,
    pub available: bool,
    /// Unix timestamp in seconds
    pub timestamp: i64,
}

impl Sample {
    pub fn new(metric: Metric, value: f64, timestamp: i64) -> Self {
        Self {
            metric,
            value,
            available: true,
            timestamp,
        }
    }

    /// Sentinel sample for a metric that could not be read
    pub fn unavailable(metric: Metric, timestamp: i64) -> Self {
        Self {
            metric,
            value: f64::NAN,
            available: false,
            timestamp,
        }
    }
}

/// Forecast for a metric at a forward horizon
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Forecast {
    pub metric: Metric,
    pub horizon_secs: u64,
    pub predicted_value: f64,
    /// Confidence in [0, 100]; 0 means "do not act on this forecast"
    pub confidence: f64,
}

/// Alert classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    ThresholdExceeded,
    PredictedExceeded,
    SourceUnhealthy,
    /// Internal step failure surfaced without aborting the tick
    Diagnostic,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::ThresholdExceeded => write!(f, "ThresholdExceeded"),
            AlertKind::PredictedExceeded => write!(f, "PredictedExceeded"),
            AlertKind::SourceUnhealthy => write!(f, "SourceUnhealthy"),
            AlertKind::Diagnostic => write!(f, "Diagnostic"),
        }
    }
}

/// An alert produced during one tick, consumed once by the Reporter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    /// Metric name or source identifier the alert refers to
    pub subject: String,
    /// Observed or predicted value that triggered the alert
    pub value: f64,
    pub threshold: f64,
    pub message: String,
    /// Unix timestamp in seconds
    pub timestamp: i64,
}

impl Alert {
    pub fn new(
        kind: AlertKind,
        subject: impl Into<String>,
        value: f64,
        threshold: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            subject: subject.into(),
            value,
            threshold,
            message: message.into(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Diagnostic alert carrying a recovered internal error
    pub fn diagnostic(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertKind::Diagnostic, subject, f64::NAN, f64::NAN, message)
    }

    /// Rebind the alert to a timestamp taken from the triggering input
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Last known status of one external load source
///
/// Overwritten in place on every poll cycle; a failed or timed-out poll
/// yields `healthy = false` with a NaN load rather than dropping the entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceStatus {
    pub source_id: String,
    pub load: f64,
    pub healthy: bool,
    /// Unix timestamp in seconds
    pub last_polled: i64,
}

impl SourceStatus {
    pub fn unhealthy(source_id: impl Into<String>, last_polled: i64) -> Self {
        Self {
            source_id: source_id.into(),
            load: f64::NAN,
            healthy: false,
            last_polled,
        }
    }
}

/// Everything observed during one tick, handed to the Reporter alongside the
/// alert batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub samples: Vec<Sample>,
    pub forecasts: Vec<Forecast>,
    pub source_statuses: Vec<SourceStatus>,
}
