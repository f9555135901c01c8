//! Response splitter
//!
//! Separates a completion into the transformed text and its analysis. A
//! completion that does not contain exactly one delimiter line degrades to
//! "whole text, no analysis" rather than failing.

use crate::core::constants::completion::DELIMITER;
use serde::Serialize;

/// A completion split into its two parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub result: String,
    pub analysis: String,
    pub raw: String,
    /// True when the delimiter was missing or repeated
    pub fallback: bool,
}

impl GenerationResult {
    /// Split `completion` using `missing_analysis` as the fallback text
    pub fn from_completion(completion: &str, missing_analysis: &str) -> Self {
        let (result, analysis) = split(completion, missing_analysis);
        Self {
            result,
            analysis,
            raw: completion.to_string(),
            fallback: split_once_exactly(completion).is_none(),
        }
    }
}

/// Split a completion into `(result, analysis)`
///
/// `missing_analysis` stands in for the analysis when the completion does
/// not contain exactly one delimiter.
pub fn split(completion: &str, missing_analysis: &str) -> (String, String) {
    match split_once_exactly(completion) {
        Some((result, analysis)) => (result.trim().to_string(), analysis.trim().to_string()),
        None => (completion.trim().to_string(), missing_analysis.to_string()),
    }
}

fn split_once_exactly(completion: &str) -> Option<(&str, &str)> {
    let (before, after) = completion.split_once(DELIMITER)?;
    if after.contains(DELIMITER) {
        return None;
    }
    Some((before, after))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::completion::{NO_ANALYSIS, NO_EXPLANATIONS};

    #[test]
    fn test_single_delimiter_splits_and_trims() {
        let (result, analysis) =
            split("  Rewritten text.\n---\n  The tone shifted.  ", NO_ANALYSIS);
        assert_eq!(result, "Rewritten text.");
        assert_eq!(analysis, "The tone shifted.");
    }

    #[test]
    fn test_missing_delimiter_falls_back() {
        let (result, analysis) = split("  Only rewritten text. \n", NO_ANALYSIS);
        assert_eq!(result, "Only rewritten text.");
        assert_eq!(analysis, NO_ANALYSIS);
    }

    #[test]
    fn test_repeated_delimiter_returns_whole_completion() {
        let completion = "part one\n---\npart two\n---\npart three";
        let (result, analysis) = split(completion, NO_ANALYSIS);
        assert_eq!(result, completion);
        assert_eq!(analysis, NO_ANALYSIS);
    }

    #[test]
    fn test_dashes_inside_a_line_are_not_a_delimiter() {
        let (result, analysis) = split("a --- b\nc----\nd", NO_ANALYSIS);
        assert_eq!(result, "a --- b\nc----\nd");
        assert_eq!(analysis, NO_ANALYSIS);
    }

    #[test]
    fn test_custom_fallback() {
        let (_, analysis) = split("no split", NO_EXPLANATIONS);
        assert_eq!(analysis, NO_EXPLANATIONS);
    }

    #[test]
    fn test_generation_result_keeps_raw_and_flags_fallback() {
        let raw = "text\n---\nnotes";
        let parsed = GenerationResult::from_completion(raw, NO_ANALYSIS);
        assert_eq!(parsed.raw, raw);
        assert!(!parsed.fallback);
        assert!(GenerationResult::from_completion("text", NO_ANALYSIS).fallback);
    }

    #[test]
    fn test_split_is_deterministic() {
        let completion = "x\n---\ny";
        assert_eq!(split(completion, NO_ANALYSIS), split(completion, NO_ANALYSIS));
    }
}
