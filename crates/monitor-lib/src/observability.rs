//! Observability infrastructure
//!
//! Prometheus metrics for the monitoring loop, registered once behind a
//! process-global handle.

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    register_int_gauge, GaugeVec, Histogram, IntCounter, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;

/// Histogram buckets for tick latency (seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

static GLOBAL_METRICS: OnceLock<MonitorMetricsInner> = OnceLock::new();

struct MonitorMetricsInner {
    tick_latency_seconds: Histogram,
    ticks_total: IntCounter,
    alerts_total: IntCounterVec,
    sample_errors_total: IntCounter,
    sample_value: GaugeVec,
    sources_unhealthy: IntGauge,
}

impl MonitorMetricsInner {
    fn new() -> Self {
        Self {
            tick_latency_seconds: register_histogram!(
                "monitor_agent_tick_latency_seconds",
                "Time spent running one monitoring tick",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register tick_latency_seconds"),

            ticks_total: register_int_counter!(
                "monitor_agent_ticks_total",
                "Total number of completed monitoring ticks"
            )
            .expect("Failed to register ticks_total"),

            alerts_total: register_int_counter_vec!(
                "monitor_agent_alerts_total",
                "Total alerts emitted, by kind",
                &["kind"]
            )
            .expect("Failed to register alerts_total"),

            sample_errors_total: register_int_counter!(
                "monitor_agent_sample_errors_total",
                "Total unavailable metric readings"
            )
            .expect("Failed to register sample_errors_total"),

            sample_value: register_gauge_vec!(
                "monitor_agent_sample_value",
                "Most recent sample value per metric",
                &["metric"]
            )
            .expect("Failed to register sample_value"),

            sources_unhealthy: register_int_gauge!(
                "monitor_agent_sources_unhealthy",
                "Number of external sources currently unhealthy"
            )
            .expect("Failed to register sources_unhealthy"),
        }
    }
}

/// Lightweight handle to the global metrics instance
///
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct MonitorMetrics {
    _private: (),
}

impl Default for MonitorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorMetrics {
    /// Create a metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(MonitorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &MonitorMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_tick_latency(&self, duration_secs: f64) {
        self.inner().tick_latency_seconds.observe(duration_secs);
    }

    pub fn inc_ticks(&self) {
        self.inner().ticks_total.inc();
    }

    pub fn inc_alerts(&self, kind: &str) {
        self.inner().alerts_total.with_label_values(&[kind]).inc();
    }

    pub fn inc_sample_errors(&self, count: u64) {
        self.inner().sample_errors_total.inc_by(count);
    }

    pub fn set_sample_value(&self, metric: &str, value: f64) {
        self.inner()
            .sample_value
            .with_label_values(&[metric])
            .set(value);
    }

    pub fn set_sources_unhealthy(&self, count: i64) {
        self.inner().sources_unhealthy.set(count);
    }
}
