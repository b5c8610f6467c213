use crate::config::ResearchConfig;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Generic LLM client trait for provider abstraction.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with a system prompt.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Stream a completion under a system prompt.
    async fn stream_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<Box<dyn futures::Stream<Item = Result<String>> + Send + Unpin>>;

    /// Get the model name/identifier.
    fn model_name(&self) -> &str;
}

/// Provider enum for runtime selection.
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including compatible endpoints).
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
        temperature: f32,
    },
}

impl Provider {
    /// Create a client instance for this provider.
    pub fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            Provider::OpenAI {
                api_key,
                api_base,
                model,
                temperature,
            } => Ok(Box::new(super::openai::OpenAIClient::new(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                *temperature,
            ))),
        }
    }

    /// Get a human-readable name for this provider.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
        }
    }
}

/// Build a client for the given model from the session config, pulling the
/// API key from the environment.
pub fn client_from_config(cfg: &ResearchConfig, model: &str) -> Result<Arc<dyn LLMClient>> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| AppError::Config("OPENAI_API_KEY is not set".to_string()))?;

    let provider = Provider::OpenAI {
        api_key,
        api_base: cfg.openai_api_base.clone(),
        model: model.to_string(),
        temperature: cfg.temperature,
    };
    provider.create_client().map(Arc::from)
}
