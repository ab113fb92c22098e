//! Shared LLM client and interaction utilities
//!
//! The pipeline only needs `complete(system, user) -> raw text`; everything
//! behind that seam (provider, model, sampling) is configured here.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;

use crate::model::ExtractionConfig;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM client not configured: {0}")]
    NotConfigured(String),

    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    #[error("LLM request timeout after {0}s")]
    Timeout(u64),
}

/// Text completion seam used by the extraction pipeline
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Model identifier, for logging
    fn model(&self) -> &str;

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;
}

/// OpenAI-backed completion client
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
    model: String,
    temperature: f64,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str, config: &ExtractionConfig) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::NotConfigured("empty API key".to_string()));
        }

        let client = openai::Client::new(api_key)
            .map_err(|e| LlmError::NotConfigured(format!("Failed to create OpenAI client: {}", e)))?;

        Ok(Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl TextCompletion for LlmClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(system_prompt)
            .temperature(self.temperature)
            .build();

        agent
            .prompt(user_prompt)
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))
    }
}
