use crate::error::{MlError, MlResult};
use advisor_core::{AdvisorError, ChatGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest {
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for the text-generation service hosting the instruction-tuned
/// language model. Generation parameters stay fixed; only the conversation
/// varies per call.
#[derive(Clone)]
pub struct ChatGeneratorClient {
    client: reqwest::Client,
    base_url: String,
}

const MAX_TOKENS: usize = 500;
const TEMPERATURE: f32 = 0.7;

impl ChatGeneratorClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Generate a reply to `message`, conditioned on the persona and prior turns
    pub async fn complete(
        &self,
        persona: &str,
        history: &[String],
        message: &str,
    ) -> MlResult<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: persona.to_string(),
        });
        // Prior turns alternate user/assistant, oldest first
        for (i, turn) in history.iter().enumerate() {
            messages.push(ChatMessage {
                role: if i % 2 == 0 { "user" } else { "assistant" }.to_string(),
                content: turn.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: message.to_string(),
        });

        let request = GenerateRequest {
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
                return Err(MlError::ModelNotLoaded);
            }
            return Err(MlError::ServiceUnavailable(format!("Status: {}", status)));
        }

        let result = response.json::<GenerateResponse>().await?;
        Ok(result.response)
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
impl ChatGenerator for ChatGeneratorClient {
    async fn generate(
        &self,
        persona: &str,
        history: &[String],
        message: &str,
    ) -> Result<String, AdvisorError> {
        self.complete(persona, history, message)
            .await
            .map_err(Into::into)
    }
}
