//! Generation client
//!
//! Wraps a [`Provider`] with the fixed system instruction, model and token
//! ceiling, and reduces a completion response to its trimmed text.

use crate::core::config::Config;
use crate::core::provider::{GenerationError, Provider};
use crate::models::openai::{OpenAIChatCompletionRequest, OpenAIMessage};
use crate::session::Credential;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Single-shot completion client shared by all sessions
#[derive(Clone)]
pub struct GenerationClient {
    provider: Arc<dyn Provider>,
    model: String,
    system_prompt: String,
    max_output_tokens: u32,
}

impl GenerationClient {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            system_prompt: system_prompt.into(),
            max_output_tokens,
        }
    }

    pub fn from_config(provider: Arc<dyn Provider>, config: &Config) -> Self {
        Self::new(
            provider,
            config.model.clone(),
            config.system_prompt.clone(),
            config.max_output_tokens,
        )
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the wire request for a prompt
    pub fn request_for(&self, prompt: &str, max_output_tokens: u32) -> OpenAIChatCompletionRequest {
        OpenAIChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAIMessage::system(self.system_prompt.clone()),
                OpenAIMessage::user(prompt),
            ],
            max_tokens: Some(max_output_tokens),
        }
    }

    /// Generate with the configured token ceiling
    pub async fn generate(
        &self,
        credential: Option<&Credential>,
        prompt: &str,
    ) -> Result<String, GenerationError> {
        self.generate_with_limit(credential, prompt, self.max_output_tokens)
            .await
    }

    /// Send one completion request and return the trimmed first choice
    ///
    /// Never contacts the provider without a credential.
    pub async fn generate_with_limit(
        &self,
        credential: Option<&Credential>,
        prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String, GenerationError> {
        let credential = credential.ok_or(GenerationError::MissingCredential)?;

        let request = self.request_for(prompt, max_output_tokens);
        info!(
            "Requesting completion from {}: model={}, prompt_chars={}",
            self.provider.provider_name(),
            self.model,
            prompt.len()
        );

        let response = self
            .provider
            .create_chat_completion(credential.expose(), &request)
            .await
            .inspect_err(|e| error!("Generation failed: {}", e))?;

        let text = response
            .first_content()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or(GenerationError::EmptyCompletion)?;

        debug!("Completion received: {} chars", text.len());
        Ok(text.to_string())
    }
}
