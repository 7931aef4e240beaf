//! Forecast generation
//!
//! Two implementations behind one trait: a dependency-free linear
//! extrapolation (the default) and a delegate to an external inference
//! collaborator. Both refuse to guess on thin history by returning a
//! zero-confidence forecast, which the evaluator can never act on.

mod external;
mod linear;

pub use external::{ExternalPredictor, InferenceBackend};
pub use linear::{linear_fit, LinearPredictor};

use crate::error::MonitorError;
use crate::models::{Forecast, Metric, Sample};

/// Trait for forecast implementations
pub trait Predictor: Send + Sync {
    /// Forecast `metric` at `horizon_secs` from a chronological history
    /// snapshot
    ///
    /// Implementations must return confidence 0 when the history is too
    /// short to support a forecast, never a fabricated confidence.
    fn predict(
        &self,
        metric: Metric,
        history: &[Sample],
        horizon_secs: u64,
    ) -> Result<Forecast, MonitorError>;
}

/// Zero-confidence forecast used when history is insufficient
pub(crate) fn insufficient_history(
    metric: Metric,
    history: &[Sample],
    horizon_secs: u64,
) -> Forecast {
    Forecast {
        metric,
        horizon_secs,
        predicted_value: history.last().map(|s| s.value).unwrap_or(f64::NAN),
        confidence: 0.0,
    }
}
