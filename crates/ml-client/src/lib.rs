pub mod chat_generator;
pub mod error;
pub mod price_predictor;
pub mod sentiment;

pub use chat_generator::ChatGeneratorClient;
pub use error::{MlError, MlResult};
pub use price_predictor::PricePredictorClient;
pub use sentiment::SentimentClient;

use std::time::Duration;

/// Configuration for the pretrained-model services
#[derive(Debug, Clone)]
pub struct MlConfig {
    pub sentiment_url: String,
    pub price_predictor_url: String,
    pub chat_url: String,
    pub timeout: Duration,
    pub chat_timeout: Duration,
}

impl Default for MlConfig {
    fn default() -> Self {
        Self {
            sentiment_url: std::env::var("ML_SENTIMENT_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            price_predictor_url: std::env::var("ML_PRICE_PREDICTOR_URL")
                .unwrap_or_else(|_| "http://localhost:8002".to_string()),
            chat_url: std::env::var("ML_CHAT_URL")
                .unwrap_or_else(|_| "http://localhost:8003".to_string()),
            timeout: Duration::from_secs(10),
            chat_timeout: Duration::from_secs(30),
        }
    }
}

/// Complete ML client with all services
#[derive(Clone)]
pub struct MlClient {
    pub sentiment: SentimentClient,
    pub price_predictor: PricePredictorClient,
    pub chat: ChatGeneratorClient,
}

impl MlClient {
    pub fn new(config: MlConfig) -> Self {
        Self {
            sentiment: SentimentClient::new(config.sentiment_url.clone(), config.timeout),
            price_predictor: PricePredictorClient::new(
                config.price_predictor_url.clone(),
                config.timeout,
            ),
            chat: ChatGeneratorClient::new(config.chat_url.clone(), config.chat_timeout),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(MlConfig::default())
    }
}
