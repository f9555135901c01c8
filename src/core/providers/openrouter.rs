//! OpenRouter provider implementation

use crate::core::provider::{GenerationError, Provider};
use crate::models::openai::{OpenAIChatCompletionRequest, OpenAIChatCompletionResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

/// OpenRouter provider
pub struct OpenRouterProvider {
    client: Client,
    base_url: String,
    site_url: Option<String>,
    app_name: Option<String>,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider
    ///
    /// # Arguments
    ///
    /// * `base_url` - OpenRouter API base URL
    /// * `timeout` - Request timeout in seconds
    /// * `site_url` - Optional site URL for OpenRouter rankings
    /// * `app_name` - Optional application name
    pub fn new(
        base_url: String,
        timeout: u64,
        site_url: Option<String>,
        app_name: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            site_url,
            app_name,
        })
    }

    /// Classify OpenRouter errors and provide helpful messages
    fn classify_error(error_detail: &str) -> String {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("invalid") && error_lower.contains("api") {
            return "Invalid API key. Please check the key entered for this session.".to_string();
        }

        if error_lower.contains("rate_limit") || error_lower.contains("quota") {
            return "Rate limit exceeded. Please wait and try again.".to_string();
        }

        if error_lower.contains("insufficient") && error_lower.contains("credits") {
            return "Insufficient credits. Please add credits to your OpenRouter account."
                .to_string();
        }

        if error_lower.contains("model")
            && (error_lower.contains("not found") || error_lower.contains("does not exist"))
        {
            return "Model not found. Please check the generation.model setting.".to_string();
        }

        error_detail.to_string()
    }
}

#[async_trait]
impl Provider for OpenRouterProvider {
    async fn create_chat_completion(
        &self,
        api_key: &str,
        request: &OpenAIChatCompletionRequest,
    ) -> Result<OpenAIChatCompletionResponse, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);

        info!(
            "Sending request to OpenRouter: model={}, max_tokens={:?}",
            request.model, request.max_tokens
        );

        let mut req_builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .bearer_auth(api_key);

        if let Some(site_url) = &self.site_url {
            req_builder = req_builder.header("HTTP-Referer", site_url);
        }
        if let Some(app_name) = &self.app_name {
            req_builder = req_builder.header("X-Title", app_name);
        }

        let response = req_builder
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Unexpected(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("OpenRouter returned status {}", status.as_u16());
            return Err(GenerationError::from_status(
                status.as_u16(),
                Self::classify_error(&error_text),
            ));
        }

        response.json().await.map_err(|e| {
            GenerationError::Unexpected(format!("Failed to parse response: {}", e))
        })
    }

    fn provider_name(&self) -> &str {
        "OpenRouter"
    }
}
