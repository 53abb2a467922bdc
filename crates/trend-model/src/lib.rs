pub mod scaling;

pub use scaling::MinMaxScaler;

use advisor_core::{SequencePredictor, TrendDirection, TrendResult};
use std::sync::Arc;

pub const DEFAULT_WINDOW_DAYS: usize = 60;

/// Wraps the pretrained sequence model: scales a price-history window,
/// obtains the next-value estimate, and derives direction and confidence.
#[derive(Clone)]
pub struct TrendAnalyzer {
    predictor: Arc<dyn SequencePredictor>,
    window: usize,
}

impl TrendAnalyzer {
    pub fn new(predictor: Arc<dyn SequencePredictor>) -> Self {
        Self {
            predictor,
            window: DEFAULT_WINDOW_DAYS,
        }
    }

    pub fn with_window(predictor: Arc<dyn SequencePredictor>, window: usize) -> Self {
        Self { predictor, window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Analyze the trend for `symbol` over `prices` (oldest first).
    ///
    /// Fewer points than the window is not an error: it yields the neutral
    /// low-confidence sentinel. A `None` return means the analysis itself
    /// failed and callers should treat it as unavailable.
    pub async fn predict_trend(&self, symbol: &str, prices: &[f64]) -> Option<TrendResult> {
        if prices.len() < self.window {
            return Some(TrendResult::insufficient_history());
        }

        let window = &prices[prices.len() - self.window..];
        let last_price = *window.last()?;
        if last_price <= 0.0 {
            tracing::warn!("Non-positive last price for {}", symbol);
            return None;
        }

        let scaler = MinMaxScaler::fit(window)?;
        let scaled = scaler.transform_all(window);

        let next_scaled = match self.predictor.predict_next(symbol, &scaled).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Trend prediction failed for {}: {}", symbol, e);
                return None;
            }
        };

        let predicted = scaler.inverse(next_scaled);
        if !predicted.is_finite() {
            tracing::warn!("Non-finite prediction for {}", symbol);
            return None;
        }

        let trend = if predicted > last_price {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        };

        // The raw ratio is unbounded for violent swings; clamp keeps the
        // confidence a valid probability-like weight.
        let confidence = ((predicted - last_price).abs() / last_price).clamp(0.0, 1.0);

        Some(TrendResult {
            trend,
            confidence,
            prediction: Some(predicted),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{AdvisorError, SequencePredictor};
    use async_trait::async_trait;

    struct FixedPredictor(f64);

    #[async_trait]
    impl SequencePredictor for FixedPredictor {
        async fn predict_next(&self, _symbol: &str, _window: &[f64]) -> Result<f64, AdvisorError> {
            Ok(self.0)
        }
    }

    struct FailingPredictor;

    #[async_trait]
    impl SequencePredictor for FailingPredictor {
        async fn predict_next(&self, _symbol: &str, _window: &[f64]) -> Result<f64, AdvisorError> {
            Err(AdvisorError::ModelError("model artifact missing".into()))
        }
    }

    fn analyzer(predictor: impl SequencePredictor + 'static) -> TrendAnalyzer {
        TrendAnalyzer::new(Arc::new(predictor))
    }

    #[tokio::test]
    async fn short_history_returns_neutral_sentinel() {
        let analyzer = analyzer(FixedPredictor(0.5));
        let prices = vec![100.0; 10];

        let result = analyzer.predict_trend("XYZ", &prices).await.unwrap();
        assert_eq!(result.trend, TrendDirection::Neutral);
        assert_eq!(result.confidence, 0.5);
        assert!(result.prediction.is_none());
    }

    #[tokio::test]
    async fn full_window_produces_a_prediction() {
        let analyzer = analyzer(FixedPredictor(0.9));
        let mut prices = vec![100.0; 59];
        prices.push(110.0);

        let result = analyzer.predict_trend("XYZ", &prices).await.unwrap();
        assert!(result.prediction.is_some());
        // 0.9 in scaled space is 109.0, below the last price of 110.0
        assert_eq!(result.trend, TrendDirection::Down);
        assert!(result.confidence > 0.0 && result.confidence <= 1.0);
    }

    #[tokio::test]
    async fn upward_prediction_reports_up() {
        let analyzer = analyzer(FixedPredictor(1.0));
        let mut prices: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.1).collect();
        prices[59] = 100.0; // last sits below the window max

        let result = analyzer.predict_trend("XYZ", &prices).await.unwrap();
        assert_eq!(result.trend, TrendDirection::Up);
    }

    #[tokio::test]
    async fn confidence_is_clamped_for_violent_swings() {
        // Scaled 1.0 inverts to the window max of 1000.0, a 99x move over
        // the last price; the raw ratio would far exceed 1.
        let mut prices = vec![1000.0];
        prices.extend(std::iter::repeat(10.0).take(59));

        let analyzer = analyzer(FixedPredictor(1.0));
        let result = analyzer.predict_trend("XYZ", &prices).await.unwrap();
        assert_eq!(result.confidence, 1.0);
    }

    #[tokio::test]
    async fn predictor_failure_surfaces_as_unavailable() {
        let analyzer = analyzer(FailingPredictor);
        let prices = vec![100.0; 60];

        assert!(analyzer.predict_trend("XYZ", &prices).await.is_none());
    }

    #[tokio::test]
    async fn uses_only_the_trailing_window() {
        let analyzer = TrendAnalyzer::with_window(Arc::new(FixedPredictor(0.0)), 5);
        // Old outlier outside the window must not affect scaling
        let prices = vec![1_000_000.0, 10.0, 11.0, 12.0, 11.0, 10.0];

        let result = analyzer.predict_trend("XYZ", &prices).await.unwrap();
        // Scaled 0.0 inverts to the window min (10.0), equal to last -> Down
        assert_eq!(result.trend, TrendDirection::Down);
        assert_eq!(result.prediction, Some(10.0));
    }
}
