//! Tool pipeline
//!
//! Resolve input, build the prompt, generate, split, and assemble the
//! report. Each step aborts the run on failure; nothing partial is returned.

use crate::core::generation::GenerationClient;
use crate::core::provider::GenerationError;
use crate::input::{FetchError, InputResolver};
use crate::report::Report;
use crate::session::Credential;
use crate::tools::{GenerationResult, ToolKind, ToolRequest};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Please paste an article or URL into the text area.")]
    EmptyInput,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Everything produced by one successful run
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutcome {
    pub kind: ToolKind,
    /// Resolved input text
    pub original: String,
    pub generation: GenerationResult,
    pub report: Report,
}

pub struct Pipeline {
    resolver: InputResolver,
    generator: GenerationClient,
}

impl Pipeline {
    pub fn new(resolver: InputResolver, generator: GenerationClient) -> Self {
        Self {
            resolver,
            generator,
        }
    }

    pub fn generator(&self) -> &GenerationClient {
        &self.generator
    }

    pub async fn run(
        &self,
        credential: Option<&Credential>,
        request: &ToolRequest,
    ) -> Result<ToolOutcome, PipelineError> {
        let kind = request.kind();
        if credential.is_none() {
            return Err(GenerationError::MissingCredential.into());
        }
        if request.text().trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        info!("Running tool: {}", kind.name());

        let original = self
            .resolver
            .resolve(request.text())
            .await
            .inspect_err(|e| warn!("Input resolution failed: {}", e))?;
        if original.trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let prompt = request.prompt_for(&original);
        let completion = self.generator.generate(credential, &prompt).await?;

        let generation = GenerationResult::from_completion(&completion, kind.missing_analysis());
        if generation.fallback {
            info!("Completion had no single delimiter line; showing it without analysis");
        }

        let report = Report::new(
            kind.report_title(),
            original.clone(),
            generation.result.clone(),
            generation.analysis.clone(),
        );

        Ok(ToolOutcome {
            kind,
            original,
            generation,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::generation::SYSTEM_PROMPT;
    use crate::core::generation::testing::StubProvider;
    use crate::tools::ToolParams;
    use crate::tools::params::Perspective;
    use std::sync::Arc;

    fn pipeline(provider: Arc<StubProvider>) -> Pipeline {
        Pipeline::new(
            InputResolver::new(2).unwrap(),
            GenerationClient::new(provider, "gpt-4o", SYSTEM_PROMPT, 1800),
        )
    }

    fn key() -> Credential {
        Credential::new("sk-test").unwrap()
    }

    #[tokio::test]
    async fn test_successful_run_builds_report() {
        let provider = Arc::new(StubProvider::replying(
            "Written as I saw it.\n---\nSwitched to first person.",
        ));
        let request = ToolRequest::new(
            ToolParams::Perspective {
                perspective: Perspective::FirstPerson,
            },
            "The mayor saw the flood.",
        );

        let outcome = pipeline(provider.clone())
            .run(Some(&key()), &request)
            .await
            .unwrap();

        assert_eq!(outcome.kind, ToolKind::Perspective);
        assert_eq!(outcome.original, "The mayor saw the flood.");
        assert_eq!(outcome.generation.result, "Written as I saw it.");
        assert_eq!(outcome.generation.analysis, "Switched to first person.");
        assert_eq!(outcome.report.title, "Narrative Perspective Changer Report");
        assert_eq!(outcome.report.result, "Written as I saw it.");

        let calls = provider.calls.lock().unwrap();
        let user_prompt = calls[0].1.messages[1].content.clone().unwrap();
        assert_eq!(user_prompt, request.prompt_for("The mayor saw the flood."));
        assert!(user_prompt.contains("from a first-person perspective"));
    }

    #[tokio::test]
    async fn test_fallback_uses_tool_placeholder() {
        let provider = Arc::new(StubProvider::replying("Facts and opinions, unsplit."));
        let request = ToolRequest::new(ToolParams::FactOpinion, "text");
        let outcome = pipeline(provider).run(Some(&key()), &request).await.unwrap();
        assert_eq!(outcome.generation.analysis, "No separate explanations provided.");
        assert_eq!(outcome.report.analysis, "No separate explanations provided.");
    }

    #[tokio::test]
    async fn test_empty_input_aborts_before_generation() {
        let provider = Arc::new(StubProvider::replying("unused"));
        let request = ToolRequest::new(ToolParams::Debate, "   ");
        let result = pipeline(provider.clone()).run(Some(&key()), &request).await;
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unauthenticated_run_is_refused() {
        let provider = Arc::new(StubProvider::replying("unused"));
        let request = ToolRequest::new(ToolParams::Debate, "text");
        let result = pipeline(provider.clone()).run(None, &request).await;
        assert!(matches!(
            result,
            Err(PipelineError::Generation(GenerationError::MissingCredential))
        ));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_before_generation() {
        let provider = Arc::new(StubProvider::replying("unused"));
        let request = ToolRequest::new(ToolParams::Neutralizer, "http://127.0.0.1:1/story");
        let result = pipeline(provider.clone()).run(Some(&key()), &request).await;
        assert!(matches!(result, Err(PipelineError::Fetch(_))));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_surfaces() {
        let provider = Arc::new(StubProvider::failing(401));
        let request = ToolRequest::new(ToolParams::Rhetoric, "text");
        let result = pipeline(provider).run(Some(&key()), &request).await;
        assert!(matches!(
            result,
            Err(PipelineError::Generation(GenerationError::Authentication(_)))
        ));
    }

    #[tokio::test]
    async fn test_same_request_same_outcome() {
        let completion = "Calmer text.\n---\nRemoved loaded words.";
        let request = ToolRequest::new(ToolParams::Neutralizer, "Outrageous scandal!");
        let first = pipeline(Arc::new(StubProvider::replying(completion)))
            .run(Some(&key()), &request)
            .await
            .unwrap();
        let second = pipeline(Arc::new(StubProvider::replying(completion)))
            .run(Some(&key()), &request)
            .await
            .unwrap();
        assert_eq!(first.generation, second.generation);
        assert_eq!(first.report, second.report);
    }
}
