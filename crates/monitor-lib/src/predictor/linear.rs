//! Linear-extrapolation predictor
//!
//! Fits a least-squares line over the history snapshot (value against
//! elapsed seconds) and extrapolates it to the horizon. Confidence is the
//! coefficient of determination scaled to [0, 100], so an erratic series
//! yields a forecast the evaluator will ignore.

use super::{insufficient_history, Predictor};
use crate::error::MonitorError;
use crate::models::{Forecast, Metric, Sample};

/// Default predictor: least-squares extrapolation over the history window
#[derive(Debug, Clone)]
pub struct LinearPredictor {
    min_samples: usize,
}

impl LinearPredictor {
    pub fn new(min_samples: usize) -> Self {
        Self {
            min_samples: min_samples.max(2),
        }
    }
}

impl Predictor for LinearPredictor {
    fn predict(
        &self,
        metric: Metric,
        history: &[Sample],
        horizon_secs: u64,
    ) -> Result<Forecast, MonitorError> {
        if history.len() < self.min_samples {
            return Ok(insufficient_history(metric, history, horizon_secs));
        }

        let t0 = history[0].timestamp;
        let points: Vec<(f64, f64)> = history
            .iter()
            .map(|s| ((s.timestamp - t0) as f64, s.value))
            .collect();

        let (slope, intercept, r_squared) = linear_fit(&points);

        let last_t = points.last().map(|(t, _)| *t).unwrap_or(0.0);
        let predicted_value = intercept + slope * (last_t + horizon_secs as f64);

        Ok(Forecast {
            metric,
            horizon_secs,
            predicted_value,
            confidence: (r_squared * 100.0).clamp(0.0, 100.0),
        })
    }
}

/// Least-squares fit over (x, y) points
///
/// Returns (slope, intercept, r_squared). A series with no y-variance fits
/// itself exactly and reports r_squared = 1; a degenerate x-spread (all
/// samples at one instant) reports a flat zero-confidence fit.
pub fn linear_fit(points: &[(f64, f64)]) -> (f64, f64, f64) {
    let n = points.len() as f64;
    if points.len() < 2 {
        return (0.0, points.first().map(|(_, y)| *y).unwrap_or(0.0), 0.0);
    }

    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();
    let sum_x2: f64 = points.iter().map(|(x, _)| x * x).sum();

    let denom = n * sum_x2 - sum_x * sum_x;
    let mean_y = sum_y / n;
    if denom.abs() < f64::EPSILON {
        return (0.0, mean_y, 0.0);
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = mean_y - slope * (sum_x / n);

    let ss_tot: f64 = points.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = points
        .iter()
        .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
        .sum();

    let r_squared = if ss_tot < f64::EPSILON {
        1.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    (slope, intercept, r_squared)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<Sample> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Sample::new(Metric::Cpu, *v, 1000 + i as i64 * 10))
            .collect()
    }

    #[test]
    fn test_insufficient_history_zero_confidence() {
        let predictor = LinearPredictor::new(10);
        let history = series(&[50.0, 52.0]);

        let forecast = predictor.predict(Metric::Cpu, &history, 300).unwrap();

        assert_eq!(forecast.confidence, 0.0);
    }

    #[test]
    fn test_empty_history_zero_confidence() {
        let predictor = LinearPredictor::new(10);
        let forecast = predictor.predict(Metric::Memory, &[], 300).unwrap();
        assert_eq!(forecast.confidence, 0.0);
        assert!(forecast.predicted_value.is_nan());
    }

    #[test]
    fn test_rising_trend_extrapolates_upward() {
        let predictor = LinearPredictor::new(5);
        // +1.0 per 10s over 20 samples
        let history = series(&(0..20).map(|i| 50.0 + i as f64).collect::<Vec<_>>());

        let forecast = predictor.predict(Metric::Cpu, &history, 300).unwrap();

        // 0.1/s slope: last value 69, +30 at the horizon
        assert!((forecast.predicted_value - 99.0).abs() < 0.5);
        // Exact linear series fits perfectly
        assert!(forecast.confidence > 99.0);
        assert_eq!(forecast.horizon_secs, 300);
    }

    #[test]
    fn test_flat_series_confident_flat_forecast() {
        let predictor = LinearPredictor::new(5);
        let history = series(&[60.0; 15]);

        let forecast = predictor.predict(Metric::Memory, &history, 300).unwrap();

        assert!((forecast.predicted_value - 60.0).abs() < 1e-9);
        assert_eq!(forecast.confidence, 100.0);
    }

    #[test]
    fn test_noisy_series_low_confidence() {
        let predictor = LinearPredictor::new(5);
        // Alternating spikes carry no linear trend
        let values: Vec<f64> = (0..20)
            .map(|i| if i % 2 == 0 { 10.0 } else { 90.0 })
            .collect();
        let history = series(&values);

        let forecast = predictor.predict(Metric::Traffic, &history, 300).unwrap();

        assert!(forecast.confidence < 10.0);
    }

    #[test]
    fn test_linear_fit_known_slope() {
        let points: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 2.0 * i as f64 + 1.0)).collect();
        let (slope, intercept, r2) = linear_fit(&points);
        assert!((slope - 2.0).abs() < 1e-9);
        assert!((intercept - 1.0).abs() < 1e-9);
        assert!((r2 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_fit_degenerate_x() {
        let points = vec![(0.0, 1.0), (0.0, 5.0), (0.0, 9.0)];
        let (slope, _, r2) = linear_fit(&points);
        assert_eq!(slope, 0.0);
        assert_eq!(r2, 0.0);
    }
}
