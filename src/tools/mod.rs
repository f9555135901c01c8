//! Rewriting tools: identifiers, typed parameters, prompts and completion parsing

pub mod kind;
pub mod params;
pub mod prompt;
pub mod request;
pub mod split;

pub use kind::ToolKind;
pub use params::ToolParams;
pub use request::ToolRequest;
pub use split::GenerationResult;
