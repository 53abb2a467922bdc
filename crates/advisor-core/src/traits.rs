use crate::AdvisorError;
use async_trait::async_trait;

/// Pretrained sequence model producing the next scaled value for a
/// min-max-scaled price window.
#[async_trait]
pub trait SequencePredictor: Send + Sync {
    async fn predict_next(&self, symbol: &str, scaled_window: &[f64]) -> Result<f64, AdvisorError>;
}

/// Pretrained causal language model answering free-text messages under a
/// fixed persona.
#[async_trait]
pub trait ChatGenerator: Send + Sync {
    async fn generate(
        &self,
        persona: &str,
        history: &[String],
        message: &str,
    ) -> Result<String, AdvisorError>;
}
