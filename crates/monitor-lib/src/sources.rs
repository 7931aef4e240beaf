//! External load source polling
//!
//! Polls every configured source concurrently each tick, with a per-source
//! timeout. A source that fails or times out is reported with an unhealthy
//! sentinel status rather than dropped, and only alerts after enough
//! consecutive bad polls to rule out a single transient failure.

use crate::models::{Alert, AlertKind, SourceStatus};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub use async_trait::async_trait;

/// One successful load reading from an external source
#[derive(Debug, Clone, Copy)]
pub struct SourceLoad {
    /// Load percentage reported by the source
    pub load: f64,
    pub healthy: bool,
}

/// Collaborator contract for cluster or cloud load backends
#[async_trait]
pub trait LoadSource: Send + Sync {
    /// Fetch the current load for `source_id`
    ///
    /// Errors and timeouts are treated identically by the aggregator.
    async fn fetch_load(&self, source_id: &str) -> anyhow::Result<SourceLoad>;
}

/// Polls all configured sources and tracks per-source unhealthy streaks
pub struct SourceAggregator {
    source_ids: Vec<String>,
    client: Arc<dyn LoadSource>,
    /// Consecutive unhealthy polls before an alert fires
    debounce: u32,
    unhealthy_streaks: HashMap<String, u32>,
}

impl SourceAggregator {
    pub fn new(source_ids: Vec<String>, client: Arc<dyn LoadSource>, debounce: u32) -> Self {
        Self {
            source_ids,
            client,
            debounce: debounce.max(1),
            unhealthy_streaks: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.source_ids.is_empty()
    }

    /// Poll every configured source concurrently, joining all results
    ///
    /// Returns one status per configured source in configuration order, plus
    /// any debounced unhealthy alerts. An in-flight poll past its timeout is
    /// abandoned and counted as unhealthy, never awaited indefinitely.
    pub async fn poll_all(
        &mut self,
        timeout_per_source: Duration,
    ) -> (Vec<SourceStatus>, Vec<Alert>) {
        let handles: Vec<_> = self
            .source_ids
            .iter()
            .map(|source_id| {
                let client = Arc::clone(&self.client);
                let source_id = source_id.clone();
                tokio::spawn(async move {
                    let result =
                        tokio::time::timeout(timeout_per_source, client.fetch_load(&source_id))
                            .await;
                    let polled_at = chrono::Utc::now().timestamp();
                    let status = match result {
                        Ok(Ok(load)) if load.healthy => SourceStatus {
                            source_id: source_id.clone(),
                            load: load.load,
                            healthy: true,
                            last_polled: polled_at,
                        },
                        Ok(Ok(load)) => SourceStatus {
                            source_id: source_id.clone(),
                            load: load.load,
                            healthy: false,
                            last_polled: polled_at,
                        },
                        Ok(Err(e)) => {
                            debug!(source_id = %source_id, error = %e, "Source poll failed");
                            SourceStatus::unhealthy(source_id.clone(), polled_at)
                        }
                        Err(_) => {
                            debug!(source_id = %source_id, "Source poll timed out");
                            SourceStatus::unhealthy(source_id.clone(), polled_at)
                        }
                    };
                    status
                })
            })
            .collect();

        let mut statuses = Vec::with_capacity(handles.len());
        for (handle, source_id) in handles.into_iter().zip(self.source_ids.iter()) {
            match handle.await {
                Ok(status) => statuses.push(status),
                Err(e) => {
                    warn!(source_id = %source_id, error = %e, "Source poll task panicked");
                    statuses.push(SourceStatus::unhealthy(
                        source_id.clone(),
                        chrono::Utc::now().timestamp(),
                    ));
                }
            }
        }

        let alerts = self.update_streaks(&statuses);
        (statuses, alerts)
    }

    /// Advance per-source streak counters and emit debounced alerts
    ///
    /// An alert fires exactly when a source crosses the debounce count and
    /// not again while it stays unhealthy; a single healthy poll resets the
    /// streak.
    fn update_streaks(&mut self, statuses: &[SourceStatus]) -> Vec<Alert> {
        let mut alerts = Vec::new();

        for status in statuses {
            if status.healthy {
                self.unhealthy_streaks.insert(status.source_id.clone(), 0);
                continue;
            }

            let streak = self
                .unhealthy_streaks
                .entry(status.source_id.clone())
                .or_insert(0);
            *streak += 1;

            if *streak == self.debounce {
                alerts.push(Alert::new(
                    AlertKind::SourceUnhealthy,
                    status.source_id.clone(),
                    status.load,
                    f64::NAN,
                    format!(
                        "source {} unhealthy for {} consecutive polls",
                        status.source_id, streak
                    ),
                ));
            }
        }

        alerts
    }
}
