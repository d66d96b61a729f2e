//! Prometheus telemetry for the prediction path.
//!
//! The registry is owned by the service and passed by handle, not a process
//! global, so tests get isolated counters. Recording is infallible from the
//! caller's side: a prediction must never fail because of its metrics.

use std::time::Duration;

use prometheus::{Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use tracing::warn;

use store::Sentiment;

pub struct Telemetry {
    registry: Registry,
    predictions_total: IntCounter,
    positive_predictions_total: IntCounter,
    negative_predictions_total: IntCounter,
    prediction_duration_seconds: Histogram,
}

impl Telemetry {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let predictions_total =
            IntCounter::new("predictions_total", "Total predictions made")?;
        let positive_predictions_total = IntCounter::new(
            "positive_predictions_total",
            "Positive sentiment predictions",
        )?;
        let negative_predictions_total = IntCounter::new(
            "negative_predictions_total",
            "Negative sentiment predictions",
        )?;
        let prediction_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "prediction_duration_seconds",
            "Prediction duration",
        ))?;

        registry.register(Box::new(predictions_total.clone()))?;
        registry.register(Box::new(positive_predictions_total.clone()))?;
        registry.register(Box::new(negative_predictions_total.clone()))?;
        registry.register(Box::new(prediction_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            predictions_total,
            positive_predictions_total,
            negative_predictions_total,
            prediction_duration_seconds,
        })
    }

    /// Record one completed prediction.
    pub fn observe_prediction(&self, sentiment: Sentiment, duration: Duration) {
        self.predictions_total.inc();
        match sentiment {
            Sentiment::Positive => self.positive_predictions_total.inc(),
            Sentiment::Negative => self.negative_predictions_total.inc(),
        }
        self.prediction_duration_seconds
            .observe(duration.as_secs_f64());
    }

    /// Render the registry in the text exposition format.
    ///
    /// Encoding failures degrade to an empty body rather than an error.
    pub fn render(&self) -> String {
        let families = self.registry.gather();
        match TextEncoder::new().encode_to_string(&families) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to encode metrics: {e}");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_prediction_updates_counters() {
        let telemetry = Telemetry::new().unwrap();
        telemetry.observe_prediction(Sentiment::Positive, Duration::from_millis(5));
        telemetry.observe_prediction(Sentiment::Negative, Duration::from_millis(7));
        telemetry.observe_prediction(Sentiment::Positive, Duration::from_millis(2));

        let body = telemetry.render();
        assert!(body.contains("predictions_total 3"));
        assert!(body.contains("positive_predictions_total 2"));
        assert!(body.contains("negative_predictions_total 1"));
        assert!(body.contains("prediction_duration_seconds"));
    }

    #[test]
    fn test_fresh_registry_renders_all_families() {
        let telemetry = Telemetry::new().unwrap();
        let body = telemetry.render();
        for name in [
            "predictions_total",
            "positive_predictions_total",
            "negative_predictions_total",
            "prediction_duration_seconds",
        ] {
            assert!(body.contains(name), "missing metric family {name}");
        }
    }
}
