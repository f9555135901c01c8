//! OpenAI provider implementation

use crate::core::provider::{GenerationError, Provider};
use crate::models::openai::{OpenAIChatCompletionRequest, OpenAIChatCompletionResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// OpenAI provider (supports OpenAI and Azure OpenAI)
pub struct OpenAIProvider {
    client: Client,
    base_url: String,
    api_version: Option<String>,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    ///
    /// # Arguments
    ///
    /// * `base_url` - OpenAI API base URL or Azure endpoint
    /// * `timeout` - Request timeout in seconds
    /// * `api_version` - Optional Azure API version (enables Azure mode)
    pub fn new(base_url: String, timeout: u64, api_version: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            api_version,
        })
    }

    /// Classify OpenAI errors and provide helpful messages
    pub(crate) fn classify_error(error_detail: &str) -> String {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("unsupported_country_region_territory")
            || error_lower.contains("country, region, or territory not supported")
        {
            return "OpenAI API is not available in your region.".to_string();
        }

        if error_lower.contains("invalid_api_key") || error_lower.contains("unauthorized") {
            return "Invalid API key. Please check the key entered for this session.".to_string();
        }

        if error_lower.contains("rate_limit") || error_lower.contains("quota") {
            return "Rate limit exceeded. Please wait and try again, or upgrade your API plan."
                .to_string();
        }

        if error_lower.contains("model")
            && (error_lower.contains("not found") || error_lower.contains("does not exist"))
        {
            return "Model not found. Please check the generation.model setting.".to_string();
        }

        if error_lower.contains("billing") || error_lower.contains("payment") {
            return "Billing issue. Please check your OpenAI account billing status.".to_string();
        }

        error_detail.to_string()
    }

    fn completion_url(&self, model: &str) -> String {
        match &self.api_version {
            Some(version) => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.base_url, model, version
            ),
            None => format!("{}/chat/completions", self.base_url),
        }
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn create_chat_completion(
        &self,
        api_key: &str,
        request: &OpenAIChatCompletionRequest,
    ) -> Result<OpenAIChatCompletionResponse, GenerationError> {
        let url = self.completion_url(&request.model);
        debug!(
            "Sending completion request: model={}, max_tokens={:?}",
            request.model, request.max_tokens
        );

        let mut req_builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");

        if self.api_version.is_some() {
            // Azure uses api-key header
            req_builder = req_builder.header("api-key", api_key);
        } else {
            req_builder = req_builder.bearer_auth(api_key);
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
            warn!("OpenAI returned status {}", status.as_u16());
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
        if self.api_version.is_some() {
            "Azure OpenAI"
        } else {
            "OpenAI"
        }
    }
}
