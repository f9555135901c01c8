//! A single tool submission

use crate::tools::kind::ToolKind;
use crate::tools::params::ToolParams;
use crate::tools::prompt;
use serde::Deserialize;

/// Immutable request built once per submission
///
/// Fields are private so a request cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolRequest {
    params: ToolParams,
    text: String,
}

impl ToolRequest {
    pub fn new(params: ToolParams, text: impl Into<String>) -> Self {
        Self {
            params,
            text: text.into(),
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.params.kind()
    }

    /// Raw input as submitted: article text or a URL
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Prompt for this request applied to already-resolved text
    pub fn prompt_for(&self, resolved_text: &str) -> String {
        prompt::build(&self.params, resolved_text)
    }
}
