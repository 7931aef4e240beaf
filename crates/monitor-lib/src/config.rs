//! Monitor configuration
//!
//! `MonitorConfig` is constructed once at startup and never mutated; the loop
//! and evaluator borrow it for the process lifetime.

use serde::Deserialize;

/// Configuration for the monitoring loop and its components
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Tick interval in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Alert when a current or predicted value exceeds this
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,

    /// Whether to run the prediction stage each tick
    #[serde(default = "default_prediction_enabled")]
    pub prediction_enabled: bool,

    /// Forward horizon for forecasts, in seconds
    #[serde(default = "default_prediction_horizon_secs")]
    pub prediction_horizon_secs: u64,

    /// Minimum forecast confidence for a predicted alert to fire
    #[serde(default = "default_min_accept_confidence")]
    pub min_accept_confidence: f64,

    /// Minimum history length before the predictor produces a usable forecast
    #[serde(default = "default_min_prediction_samples")]
    pub min_prediction_samples: usize,

    /// Samples retained per metric
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// External load source identifiers to poll each tick
    #[serde(default)]
    pub sources: Vec<String>,

    /// Per-source poll timeout in milliseconds
    #[serde(default = "default_source_timeout_ms")]
    pub source_timeout_ms: u64,

    /// Consecutive unhealthy polls before a source alert fires
    #[serde(default = "default_unhealthy_debounce")]
    pub unhealthy_debounce: u32,
}

fn default_tick_interval_ms() -> u64 {
    5000
}

fn default_alert_threshold() -> f64 {
    80.0
}

fn default_prediction_enabled() -> bool {
    true
}

fn default_prediction_horizon_secs() -> u64 {
    300
}

fn default_min_accept_confidence() -> f64 {
    70.0
}

fn default_min_prediction_samples() -> usize {
    10
}

fn default_history_capacity() -> usize {
    300
}

fn default_source_timeout_ms() -> u64 {
    1000
}

fn default_unhealthy_debounce() -> u32 {
    3
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            alert_threshold: default_alert_threshold(),
            prediction_enabled: default_prediction_enabled(),
            prediction_horizon_secs: default_prediction_horizon_secs(),
            min_accept_confidence: default_min_accept_confidence(),
            min_prediction_samples: default_min_prediction_samples(),
            history_capacity: default_history_capacity(),
            sources: Vec::new(),
            source_timeout_ms: default_source_timeout_ms(),
            unhealthy_debounce: default_unhealthy_debounce(),
        }
    }
}

impl MonitorConfig {
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }

    /// Bound on a single sample call, half the tick to keep the loop live
    pub fn sample_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms / 2)
    }

    pub fn source_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.source_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.tick_interval_ms, 5000);
        assert_eq!(config.alert_threshold, 80.0);
        assert_eq!(config.min_accept_confidence, 70.0);
        assert_eq!(config.history_capacity, 300);
        assert_eq!(config.unhealthy_debounce, 3);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_sample_timeout_is_half_tick() {
        let config = MonitorConfig {
            tick_interval_ms: 10_000,
            ..Default::default()
        };
        assert_eq!(
            config.sample_timeout(),
            std::time::Duration::from_millis(5000)
        );
    }

    #[test]
    fn test_deserialize_partial() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{"alert_threshold": 95.0, "sources": ["aws", "gcp"]}"#)
                .unwrap();
        assert_eq!(config.alert_threshold, 95.0);
        assert_eq!(config.sources, vec!["aws", "gcp"]);
        assert_eq!(config.tick_interval_ms, 5000);
    }
}
