//! External-model predictor
//!
//! Delegates forecasting to an inference collaborator behind a narrow
//! series-in, (value, confidence)-out contract. How that collaborator runs
//! its model is not this crate's concern.

use super::{insufficient_history, Predictor};
use crate::error::MonitorError;
use crate::models::{Forecast, Metric, Sample};

/// Collaborator contract for an out-of-process or otherwise opaque model
pub trait InferenceBackend: Send + Sync {
    /// Forecast the next value of `series` at `horizon_secs`
    ///
    /// Returns (predicted_value, confidence in [0, 100]).
    fn infer(&self, series: &[f64], horizon_secs: u64) -> anyhow::Result<(f64, f64)>;
}

/// Predictor variant backed by an external inference collaborator
pub struct ExternalPredictor {
    backend: Box<dyn InferenceBackend>,
    min_samples: usize,
}

impl ExternalPredictor {
    pub fn new(backend: Box<dyn InferenceBackend>, min_samples: usize) -> Self {
        Self {
            backend,
            min_samples: min_samples.max(2),
        }
    }
}

impl Predictor for ExternalPredictor {
    fn predict(
        &self,
        metric: Metric,
        history: &[Sample],
        horizon_secs: u64,
    ) -> Result<Forecast, MonitorError> {
        // The backend is never consulted on thin history; it cannot know
        // better than the data allows.
        if history.len() < self.min_samples {
            return Ok(insufficient_history(metric, history, horizon_secs));
        }

        let series: Vec<f64> = history.iter().map(|s| s.value).collect();

        let (predicted_value, confidence) =
            self.backend
                .infer(&series, horizon_secs)
                .map_err(|e| MonitorError::PredictionUnavailable {
                    metric,
                    reason: e.to_string(),
                })?;

        Ok(Forecast {
            metric,
            horizon_secs,
            predicted_value,
            confidence: confidence.clamp(0.0, 100.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedBackend {
        value: f64,
        confidence: f64,
        calls: Arc<AtomicUsize>,
    }

    impl InferenceBackend for FixedBackend {
        fn infer(&self, _series: &[f64], _horizon_secs: u64) -> anyhow::Result<(f64, f64)> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((self.value, self.confidence))
        }
    }

    struct FailingBackend;

    impl InferenceBackend for FailingBackend {
        fn infer(&self, _series: &[f64], _horizon_secs: u64) -> anyhow::Result<(f64, f64)> {
            anyhow::bail!("inference service unreachable")
        }
    }

    fn series(len: usize) -> Vec<Sample> {
        (0..len)
            .map(|i| Sample::new(Metric::Cpu, 50.0, i as i64))
            .collect()
    }

    #[test]
    fn test_delegates_to_backend() {
        let calls = Arc::new(AtomicUsize::new(0));
        let predictor = ExternalPredictor::new(
            Box::new(FixedBackend {
                value: 91.5,
                confidence: 88.0,
                calls: calls.clone(),
            }),
            10,
        );

        let forecast = predictor.predict(Metric::Cpu, &series(20), 300).unwrap();

        assert_eq!(forecast.predicted_value, 91.5);
        assert_eq!(forecast.confidence, 88.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_thin_history_skips_backend() {
        let calls = Arc::new(AtomicUsize::new(0));
        let predictor = ExternalPredictor::new(
            Box::new(FixedBackend {
                value: 91.5,
                confidence: 88.0,
                calls: calls.clone(),
            }),
            10,
        );

        let forecast = predictor.predict(Metric::Cpu, &series(2), 300).unwrap();

        assert_eq!(forecast.confidence, 0.0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_backend_failure_maps_to_prediction_unavailable() {
        let predictor = ExternalPredictor::new(Box::new(FailingBackend), 5);

        let err = predictor
            .predict(Metric::Memory, &series(10), 300)
            .unwrap_err();

        assert!(matches!(
            err,
            MonitorError::PredictionUnavailable { .. }
        ));
    }

    #[test]
    fn test_out_of_range_confidence_clamped() {
        let predictor = ExternalPredictor::new(
            Box::new(FixedBackend {
                value: 50.0,
                confidence: 140.0,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            5,
        );

        let forecast = predictor.predict(Metric::Cpu, &series(10), 60).unwrap();
        assert_eq!(forecast.confidence, 100.0);
    }
}
