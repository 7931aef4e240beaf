//! Alert reporting
//!
//! The core calls `report` exactly once per tick with the merged alert batch
//! and the tick's snapshot. What a Reporter does with them (console, log
//! pipeline, paging) is its own business; the default one writes structured
//! log lines.

use crate::models::{Alert, AlertKind, TickSnapshot};
use tracing::{debug, info, warn};

/// Sink for per-tick alert batches
pub trait Reporter: Send + Sync {
    fn report(&self, batch: &[Alert], snapshot: &TickSnapshot);
}

/// Default reporter emitting structured tracing events
#[derive(Debug, Default)]
pub struct LogReporter;

impl LogReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for LogReporter {
    fn report(&self, batch: &[Alert], snapshot: &TickSnapshot) {
        for alert in batch {
            match alert.kind {
                AlertKind::Diagnostic => {
                    info!(
                        kind = %alert.kind,
                        subject = %alert.subject,
                        message = %alert.message,
                        "Diagnostic"
                    );
                }
                _ => {
                    warn!(
                        kind = %alert.kind,
                        subject = %alert.subject,
                        value = alert.value,
                        threshold = alert.threshold,
                        message = %alert.message,
                        "Alert"
                    );
                }
            }
        }

        debug!(
            alerts = batch.len(),
            samples = snapshot.samples.len(),
            forecasts = snapshot.forecasts.len(),
            sources = snapshot.source_statuses.len(),
            "Tick reported"
        );
    }
}
