use crate::error::{MlError, MlResult};
use advisor_core::{AdvisorError, SequencePredictor};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
struct PredictionRequest<'a> {
    symbol: &'a str,
    /// Min-max-scaled price window, oldest first
    window: &'a [f64],
}

#[derive(Debug, Clone, Deserialize)]
struct PredictionResponse {
    /// Next-value estimate in the same scaled space as the request window
    next_scaled: f64,
}

#[derive(Clone)]
pub struct PricePredictorClient {
    client: reqwest::Client,
    base_url: String,
}

impl PricePredictorClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Predict the next scaled value for a scaled price window
    pub async fn predict(&self, symbol: &str, window: &[f64]) -> MlResult<f64> {
        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(&PredictionRequest { symbol, window })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
                return Err(MlError::ModelNotLoaded);
            }
            return Err(MlError::ServiceUnavailable(format!("Status: {}", status)));
        }

        let result = response.json::<PredictionResponse>().await?;
        if !result.next_scaled.is_finite() {
            return Err(MlError::InvalidResponse(
                "non-finite prediction".to_string(),
            ));
        }

        Ok(result.next_scaled)
    }

    /// Check service health
    pub async fn health(&self) -> MlResult<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

#[async_trait]
impl SequencePredictor for PricePredictorClient {
    async fn predict_next(&self, symbol: &str, scaled_window: &[f64]) -> Result<f64, AdvisorError> {
        self.predict(symbol, scaled_window)
            .await
            .map_err(Into::into)
    }
}
