//! Provider abstraction layer for OpenAI-compatible completion APIs
//!
//! This module defines the trait every provider implements and the error
//! taxonomy for generation failures.

use crate::models::openai::{OpenAIChatCompletionRequest, OpenAIChatCompletionResponse};
use async_trait::async_trait;
use thiserror::Error;

/// Error types for generation
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No API key is set for this session")]
    MissingCredential,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("The model returned an empty completion")]
    EmptyCompletion,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl GenerationError {
    /// Map a non-success HTTP status and classified body to an error
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => GenerationError::Authentication(message),
            429 => GenerationError::RateLimit(message),
            400 => GenerationError::BadRequest(message),
            _ => GenerationError::ApiError { status, message },
        }
    }

    /// Short machine-readable kind used in JSON error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::MissingCredential => "missing_credential",
            GenerationError::Authentication(_) => "authentication_error",
            GenerationError::RateLimit(_) => "rate_limit_error",
            GenerationError::BadRequest(_) => "invalid_request_error",
            GenerationError::ApiError { .. } => "api_error",
            GenerationError::EmptyCompletion => "empty_completion",
            GenerationError::Unexpected(_) => "api_error",
        }
    }
}

/// Trait for chat-completion providers
///
/// The credential is passed per call because it belongs to the user's
/// session, not to the provider.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a non-streaming chat completion request
    async fn create_chat_completion(
        &self,
        api_key: &str,
        request: &OpenAIChatCompletionRequest,
    ) -> Result<OpenAIChatCompletionResponse, GenerationError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

/// Supported provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    OpenAI,
    OpenRouter,
}

impl ProviderType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(ProviderType::OpenAI),
            "openrouter" => Some(ProviderType::OpenRouter),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            GenerationError::from_status(401, "x".into()),
            GenerationError::Authentication(_)
        ));
        assert!(matches!(
            GenerationError::from_status(429, "x".into()),
            GenerationError::RateLimit(_)
        ));
        assert!(matches!(
            GenerationError::from_status(503, "x".into()),
            GenerationError::ApiError { status: 503, .. }
        ));
    }

    #[test]
    fn test_provider_type_parsing() {
        assert_eq!(ProviderType::from_str("OpenAI"), Some(ProviderType::OpenAI));
        assert_eq!(
            ProviderType::from_str("openrouter"),
            Some(ProviderType::OpenRouter)
        );
        assert_eq!(ProviderType::from_str("vertexai"), None);
    }
}
