//! Threshold evaluation
//!
//! Pure comparison of current samples and forecasts against the configured
//! threshold. No internal state, no randomness: identical inputs always
//! produce the identical alert sequence.

use crate::config::MonitorConfig;
use crate::models::{Alert, AlertKind, Forecast, Sample};

/// Evaluates samples and forecasts against the configured thresholds
#[derive(Debug, Default)]
pub struct ThresholdEvaluator;

impl ThresholdEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Produce alerts for the current tick
    ///
    /// Output order: threshold alerts in sample order, then predicted alerts
    /// in forecast order. Unavailable samples never alert (NaN compares
    /// false), and forecasts below the acceptance confidence are ignored to
    /// keep noisy predictions from paging anyone. Alert timestamps are taken
    /// from the inputs, never the wall clock.
    pub fn evaluate(
        &self,
        samples: &[Sample],
        forecasts: &[Forecast],
        config: &MonitorConfig,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();
        let tick_timestamp = samples.iter().map(|s| s.timestamp).max().unwrap_or(0);

        for sample in samples {
            if sample.available && sample.value > config.alert_threshold {
                alerts.push(
                    Alert::new(
                        AlertKind::ThresholdExceeded,
                        sample.metric.as_str(),
                        sample.value,
                        config.alert_threshold,
                        format!(
                            "{} at {:.2} exceeds threshold {:.2}",
                            sample.metric, sample.value, config.alert_threshold
                        ),
                    )
                    .with_timestamp(sample.timestamp),
                );
            }
        }

        for forecast in forecasts {
            if forecast.confidence >= config.min_accept_confidence
                && forecast.predicted_value > config.alert_threshold
            {
                alerts.push(
                    Alert::new(
                        AlertKind::PredictedExceeded,
                        forecast.metric.as_str(),
                        forecast.predicted_value,
                        config.alert_threshold,
                        format!(
                            "{} predicted at {:.2} in {}s (confidence {:.0}%), threshold {:.2}",
                            forecast.metric,
                            forecast.predicted_value,
                            forecast.horizon_secs,
                            forecast.confidence,
                            config.alert_threshold
                        ),
                    )
                    .with_timestamp(tick_timestamp),
                );
            }
        }

        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;

    fn config() -> MonitorConfig {
        MonitorConfig {
            alert_threshold: 80.0,
            min_accept_confidence: 70.0,
            history_capacity: 5,
            ..Default::default()
        }
    }

    fn forecast(metric: Metric, value: f64, confidence: f64) -> Forecast {
        Forecast {
            metric,
            horizon_secs: 300,
            predicted_value: value,
            confidence,
        }
    }

    #[test]
    fn test_single_threshold_alert_scenario() {
        // Push CPU samples [50,55,60,58,95]; only the last exceeds 80
        let samples: Vec<Sample> = [50.0, 55.0, 60.0, 58.0, 95.0]
            .iter()
            .enumerate()
            .map(|(i, v)| Sample::new(Metric::Cpu, *v, i as i64))
            .collect();

        let alerts = ThresholdEvaluator::new().evaluate(&[samples[4]], &[], &config());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::ThresholdExceeded);
        assert_eq!(alerts[0].subject, "cpu");
        assert_eq!(alerts[0].value, 95.0);
    }

    #[test]
    fn test_no_alert_at_or_below_threshold() {
        let samples = vec![
            Sample::new(Metric::Cpu, 80.0, 0),
            Sample::new(Metric::Memory, 79.9, 0),
        ];
        let alerts = ThresholdEvaluator::new().evaluate(&samples, &[], &config());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_unavailable_sample_never_alerts() {
        let samples = vec![Sample::unavailable(Metric::Cpu, 0)];
        let alerts = ThresholdEvaluator::new().evaluate(&samples, &[], &config());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_low_confidence_forecast_never_alerts() {
        // Predicted value far over the threshold, confidence below the gate
        let forecasts = vec![forecast(Metric::Cpu, 99.0, 69.9)];
        let alerts = ThresholdEvaluator::new().evaluate(&[], &forecasts, &config());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_confident_forecast_alerts() {
        let forecasts = vec![forecast(Metric::Memory, 91.0, 85.0)];
        let alerts = ThresholdEvaluator::new().evaluate(&[], &forecasts, &config());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::PredictedExceeded);
        assert_eq!(alerts[0].subject, "memory");
    }

    #[test]
    fn test_zero_confidence_forecast_never_alerts() {
        let forecasts = vec![forecast(Metric::Cpu, 999.0, 0.0)];
        let alerts = ThresholdEvaluator::new().evaluate(&[], &forecasts, &config());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let samples = vec![
            Sample::new(Metric::Cpu, 95.0, 10),
            Sample::new(Metric::Memory, 85.0, 10),
        ];
        let forecasts = vec![forecast(Metric::Traffic, 90.0, 80.0)];
        let evaluator = ThresholdEvaluator::new();
        let cfg = config();

        let first = evaluator.evaluate(&samples, &forecasts, &cfg);
        let second = evaluator.evaluate(&samples, &forecasts, &cfg);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.subject, b.subject);
            assert_eq!(a.value, b.value);
            assert_eq!(a.timestamp, b.timestamp);
        }
    }

    #[test]
    fn test_alert_timestamps_come_from_inputs() {
        let samples = vec![
            Sample::new(Metric::Cpu, 95.0, 1_700_000_000),
            Sample::new(Metric::Memory, 50.0, 1_700_000_005),
        ];
        let forecasts = vec![forecast(Metric::Traffic, 90.0, 80.0)];
        let alerts = ThresholdEvaluator::new().evaluate(&samples, &forecasts, &config());

        assert_eq!(alerts.len(), 2);
        // Threshold alert carries the triggering sample's timestamp
        assert_eq!(alerts[0].timestamp, 1_700_000_000);
        // Predicted alert carries the newest sample timestamp of the tick
        assert_eq!(alerts[1].timestamp, 1_700_000_005);
    }

    #[test]
    fn test_threshold_alerts_precede_predicted() {
        let samples = vec![Sample::new(Metric::Cpu, 95.0, 0)];
        let forecasts = vec![forecast(Metric::Memory, 90.0, 80.0)];
        let alerts = ThresholdEvaluator::new().evaluate(&samples, &forecasts, &config());

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertKind::ThresholdExceeded);
        assert_eq!(alerts[1].kind, AlertKind::PredictedExceeded);
    }
}
