//! Monitoring loop
//!
//! One scheduler task drives ticks at a fixed interval. Ticks never overlap:
//! a slow iteration defers the next tick instead of running beside it, which
//! keeps every history buffer single-writer. The stop signal is observed at
//! tick boundaries only, so an in-flight tick always completes and reports
//! before the loop transitions to `Stopped`.

use super::Reporter;
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::evaluate::ThresholdEvaluator;
use crate::health::{components, HealthRegistry};
use crate::history::MetricHistory;
use crate::models::{Alert, Metric, TickSnapshot};
use crate::observability::MonitorMetrics;
use crate::predictor::{LinearPredictor, Predictor};
use crate::sampler::{sentinel_set, Sampler};
use crate::sources::{LoadSource, SourceAggregator};
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// Loop lifecycle state
///
/// `Idle -> Sampling -> Evaluating -> Reporting -> Idle` per tick;
/// `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Sampling,
    Evaluating,
    Reporting,
    Stopped,
}

/// The monitoring loop: samples, evaluates, polls sources, reports
pub struct MonitorLoop {
    config: MonitorConfig,
    sampler: Arc<dyn Sampler>,
    predictor: Box<dyn Predictor>,
    evaluator: ThresholdEvaluator,
    aggregator: Option<SourceAggregator>,
    reporter: Arc<dyn Reporter>,
    history: MetricHistory,
    health: HealthRegistry,
    metrics: MonitorMetrics,
    state: LoopState,
}

impl MonitorLoop {
    /// Run until a stop signal arrives; returns the terminal state
    pub async fn run(mut self, mut shutdown: tokio::sync::broadcast::Receiver<()>) -> LoopState {
        info!(
            interval_ms = self.config.tick_interval_ms,
            prediction = self.config.prediction_enabled,
            sources = self.config.sources.len(),
            "Starting monitor loop"
        );

        let mut ticker = interval(self.config.tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let start = Instant::now();

                    if let Err(fatal) = self.run_tick().await {
                        error!(error = %fatal, "Fatal loop error, stopping");
                        // One final diagnostic so the failure is visible at
                        // the Reporter, then stop cleanly.
                        self.reporter.report(
                            &[Alert::diagnostic("monitor_loop", fatal.to_string())],
                            &TickSnapshot::default(),
                        );
                        self.health
                            .set_unhealthy(components::MONITOR_LOOP, fatal.to_string())
                            .await;
                        self.state = LoopState::Stopped;
                        break;
                    }

                    self.state = LoopState::Idle;
                    self.metrics.observe_tick_latency(start.elapsed().as_secs_f64());
                    self.metrics.inc_ticks();
                }
                _ = shutdown.recv() => {
                    info!("Stop signal received, shutting down monitor loop");
                    self.state = LoopState::Stopped;
                    break;
                }
            }
        }

        self.state
    }

    /// Execute one tick; `Err` only for fatal invariant violations
    async fn run_tick(&mut self) -> Result<(), MonitorError> {
        let mut diagnostics: Vec<Alert> = Vec::new();

        // Sampling: bounded so a stuck metrics source cannot stall the loop
        self.state = LoopState::Sampling;
        let samples = match tokio::time::timeout(self.config.sample_timeout(), {
            let sampler = Arc::clone(&self.sampler);
            async move { sampler.sample().await }
        })
        .await
        {
            Ok(samples) => samples,
            Err(_) => {
                let now = chrono::Utc::now().timestamp();
                diagnostics.push(Alert::diagnostic(
                    "sampler",
                    format!(
                        "sample call exceeded {}ms, substituting sentinels",
                        self.config.sample_timeout().as_millis()
                    ),
                ));
                sentinel_set(now)
            }
        };

        let mut unavailable = 0u64;
        for sample in &samples {
            if sample.available {
                self.history.push(*sample)?;
                self.metrics
                    .set_sample_value(sample.metric.as_str(), sample.value);
            } else {
                unavailable += 1;
                diagnostics.push(Alert::diagnostic(
                    sample.metric.as_str(),
                    format!("metric {} unavailable this tick", sample.metric),
                ));
            }
        }
        if unavailable > 0 {
            self.metrics.inc_sample_errors(unavailable);
            self.health
                .set_degraded(
                    components::SAMPLER,
                    format!("{unavailable} metric(s) unavailable"),
                )
                .await;
        } else {
            self.health.set_healthy(components::SAMPLER).await;
        }

        // Prediction and evaluation
        self.state = LoopState::Evaluating;
        let mut forecasts = Vec::new();
        if self.config.prediction_enabled {
            let mut prediction_failed = false;
            for metric in Metric::ALL {
                let snapshot = self.history.snapshot(metric);
                match self
                    .predictor
                    .predict(metric, &snapshot, self.config.prediction_horizon_secs)
                {
                    Ok(forecast) => forecasts.push(forecast),
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        // One metric's failure must not suppress the others
                        prediction_failed = true;
                        debug!(metric = %metric, error = %e, "Prediction unavailable");
                        diagnostics.push(Alert::diagnostic(metric.as_str(), e.to_string()));
                    }
                }
            }
            if prediction_failed {
                self.health
                    .set_degraded(components::PREDICTOR, "prediction unavailable")
                    .await;
            } else {
                self.health.set_healthy(components::PREDICTOR).await;
            }
        }

        let mut alerts = self.evaluator.evaluate(&samples, &forecasts, &self.config);

        // Source polling: the only intra-tick fan-out
        let mut source_statuses = Vec::new();
        if let Some(aggregator) = self.aggregator.as_mut() {
            if !aggregator.is_empty() {
                let (statuses, source_alerts) =
                    aggregator.poll_all(self.config.source_timeout()).await;
                let unhealthy = statuses.iter().filter(|s| !s.healthy).count();
                self.metrics.set_sources_unhealthy(unhealthy as i64);
                if unhealthy > 0 {
                    self.health
                        .set_degraded(
                            components::AGGREGATOR,
                            format!("{unhealthy} source(s) unhealthy"),
                        )
                        .await;
                } else {
                    self.health.set_healthy(components::AGGREGATOR).await;
                }
                source_statuses = statuses;
                alerts.extend(source_alerts);
            }
        }

        // Report: one batch per tick, threshold alerts first, then source
        // alerts, then diagnostics
        self.state = LoopState::Reporting;
        alerts.append(&mut diagnostics);
        for alert in &alerts {
            self.metrics.inc_alerts(&alert.kind.to_string());
        }

        let snapshot = TickSnapshot {
            samples,
            forecasts,
            source_statuses,
        };
        self.reporter.report(&alerts, &snapshot);
        self.health.set_healthy(components::MONITOR_LOOP).await;

        Ok(())
    }
}

/// Builder for assembling the monitor loop
pub struct MonitorLoopBuilder {
    config: MonitorConfig,
    sampler: Option<Arc<dyn Sampler>>,
    predictor: Option<Box<dyn Predictor>>,
    reporter: Option<Arc<dyn Reporter>>,
    source_client: Option<Arc<dyn LoadSource>>,
    health: Option<HealthRegistry>,
}

impl MonitorLoopBuilder {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            sampler: None,
            predictor: None,
            reporter: None,
            source_client: None,
            health: None,
        }
    }

    pub fn sampler(mut self, sampler: Arc<dyn Sampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Override the default linear-extrapolation predictor
    pub fn predictor(mut self, predictor: Box<dyn Predictor>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Client used to poll the configured external sources
    pub fn source_client(mut self, client: Arc<dyn LoadSource>) -> Self {
        self.source_client = Some(client);
        self
    }

    pub fn health(mut self, health: HealthRegistry) -> Self {
        self.health = Some(health);
        self
    }

    pub fn build(self) -> Result<MonitorLoop> {
        let sampler = self
            .sampler
            .ok_or_else(|| anyhow::anyhow!("Sampler is required"))?;
        let reporter = self
            .reporter
            .ok_or_else(|| anyhow::anyhow!("Reporter is required"))?;

        let aggregator = if self.config.sources.is_empty() {
            None
        } else {
            let client = self
                .source_client
                .ok_or_else(|| anyhow::anyhow!("Sources configured but no source client set"))?;
            Some(SourceAggregator::new(
                self.config.sources.clone(),
                client,
                self.config.unhealthy_debounce,
            ))
        };

        let predictor = self
            .predictor
            .unwrap_or_else(|| Box::new(LinearPredictor::new(self.config.min_prediction_samples)));

        let history = MetricHistory::new(self.config.history_capacity);

        Ok(MonitorLoop {
            config: self.config,
            sampler,
            predictor,
            evaluator: ThresholdEvaluator::new(),
            aggregator,
            reporter,
            history,
            health: self.health.unwrap_or_default(),
            metrics: MonitorMetrics::new(),
            state: LoopState::Idle,
        })
    }
}
