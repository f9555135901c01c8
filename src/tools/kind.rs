//! The ten rewriting tools and their fixed presentation strings

use crate::core::constants::completion::{NO_ANALYSIS, NO_EXPLANATIONS};
use crate::tools::params::ParamError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tool identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    #[default]
    WhatIf,
    Debate,
    Neutralizer,
    Emotion,
    Perspective,
    FactOpinion,
    Complexity,
    Rhetoric,
    CrossCultural,
    Variables,
}

impl ToolKind {
    /// Sidebar order
    pub const ALL: &'static [ToolKind] = &[
        ToolKind::WhatIf,
        ToolKind::Debate,
        ToolKind::Neutralizer,
        ToolKind::Emotion,
        ToolKind::Perspective,
        ToolKind::FactOpinion,
        ToolKind::Complexity,
        ToolKind::Rhetoric,
        ToolKind::CrossCultural,
        ToolKind::Variables,
    ];

    /// URL segment and form value
    pub fn slug(self) -> &'static str {
        match self {
            ToolKind::WhatIf => "what-if",
            ToolKind::Debate => "debate",
            ToolKind::Neutralizer => "neutralizer",
            ToolKind::Emotion => "emotion",
            ToolKind::Perspective => "perspective",
            ToolKind::FactOpinion => "fact-opinion",
            ToolKind::Complexity => "complexity",
            ToolKind::Rhetoric => "rhetoric",
            ToolKind::CrossCultural => "cross-cultural",
            ToolKind::Variables => "variables",
        }
    }

    /// Name shown in the tool selector
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::WhatIf => "What If? Scenario Analyzer",
            ToolKind::Debate => "Debate Counter-Argument Generator",
            ToolKind::Neutralizer => "Article Neutralizer",
            ToolKind::Emotion => "Emotion Amplifier/Reducer",
            ToolKind::Perspective => "Narrative Perspective Changer",
            ToolKind::FactOpinion => "Fact vs. Opinion Analyzer",
            ToolKind::Complexity => "Information Complexity Mixer",
            ToolKind::Rhetoric => "Rhetorical Device Highlighter",
            ToolKind::CrossCultural => "Cross-Cultural Interpretation Tool",
            ToolKind::Variables => "Variable Adjustment",
        }
    }

    /// Page header for the tool's form
    pub fn header(self) -> &'static str {
        match self {
            ToolKind::Variables => "Variable Adjustment Analysis",
            other => other.name(),
        }
    }

    /// Label of the action button
    pub fn action_label(self) -> &'static str {
        match self {
            ToolKind::WhatIf => "Apply What If? Scenario",
            ToolKind::Debate => "Generate Counter-Argument",
            ToolKind::Neutralizer => "Neutralize Text",
            ToolKind::Emotion => "Apply Emotion Change",
            ToolKind::Perspective => "Change Perspective",
            ToolKind::FactOpinion => "Analyze Fact vs. Opinion",
            ToolKind::Complexity => "Apply Complexity Change",
            ToolKind::Rhetoric => "Highlight Rhetorical Devices",
            ToolKind::CrossCultural => "Apply Cultural Interpretation",
            ToolKind::Variables => "Analyze with Variables",
        }
    }

    /// Heading above the transformed text
    pub fn result_label(self) -> &'static str {
        match self {
            ToolKind::Debate => "Counter-Argument",
            ToolKind::Neutralizer => "Neutralized Text",
            ToolKind::FactOpinion => "Analyzed Text",
            ToolKind::Rhetoric => "Highlighted Text",
            ToolKind::Variables => "Rewritten Text",
            _ => "Modified Text",
        }
    }

    /// Heading above the analysis
    pub fn analysis_label(self) -> &'static str {
        if self.reports_explanations() {
            "Explanations"
        } else {
            "Analysis"
        }
    }

    /// Placeholder used when the completion had no delimiter
    pub fn missing_analysis(self) -> &'static str {
        if self.reports_explanations() {
            NO_EXPLANATIONS
        } else {
            NO_ANALYSIS
        }
    }

    /// Title of the exported HTML report
    pub fn report_title(self) -> &'static str {
        match self {
            ToolKind::WhatIf => "What If? Scenario Analysis",
            ToolKind::Debate => "Debate Counter-Argument Report",
            ToolKind::Neutralizer => "Text Neutralization Report",
            ToolKind::Emotion => "Emotion Amplifier/Reducer Report",
            ToolKind::Perspective => "Narrative Perspective Changer Report",
            ToolKind::FactOpinion => "Fact vs. Opinion Analyzer Report",
            ToolKind::Complexity => "Information Complexity Mixer Report",
            ToolKind::Rhetoric => "Rhetorical Device Highlighter Report",
            ToolKind::CrossCultural => "Cross-Cultural Interpretation Report",
            ToolKind::Variables => "Variable Adjustment Analysis Report",
        }
    }

    fn reports_explanations(self) -> bool {
        matches!(self, ToolKind::FactOpinion | ToolKind::Rhetoric)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = ParamError;

    /// Accepts either the slug or the display name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ToolKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.slug() == s || kind.name() == s)
            .ok_or_else(|| ParamError::UnknownTool(s.to_string()))
    }
}
