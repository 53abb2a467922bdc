use crate::error::{MlError, MlResult};
use advisor_core::{Sentiment, SentimentLabel};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
struct SentimentRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct SentimentResponse {
    label: String,
    score: f64,
}

#[derive(Clone)]
pub struct SentimentClient {
    client: reqwest::Client,
    base_url: String,
}

impl SentimentClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Classify the sentiment of a single text
    pub async fn classify(&self, text: &str) -> MlResult<Sentiment> {
        let response = self
            .client
            .post(format!("{}/classify", self.base_url))
            .json(&SentimentRequest { text })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
                return Err(MlError::ModelNotLoaded);
            }
            return Err(MlError::ServiceUnavailable(format!("Status: {}", status)));
        }

        let result = response.json::<SentimentResponse>().await?;
        Ok(Sentiment {
            label: parse_label(&result.label)?,
            score: result.score.clamp(0.0, 1.0),
        })
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

fn parse_label(label: &str) -> MlResult<SentimentLabel> {
    match label.to_ascii_uppercase().as_str() {
        "POSITIVE" => Ok(SentimentLabel::Positive),
        "NEGATIVE" => Ok(SentimentLabel::Negative),
        "NEUTRAL" => Ok(SentimentLabel::Neutral),
        other => Err(MlError::InvalidResponse(format!(
            "Unknown sentiment label: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!(parse_label("positive").unwrap(), SentimentLabel::Positive);
        assert_eq!(parse_label("NEGATIVE").unwrap(), SentimentLabel::Negative);
        assert_eq!(parse_label("Neutral").unwrap(), SentimentLabel::Neutral);
        assert!(parse_label("bullish").is_err());
    }
}
