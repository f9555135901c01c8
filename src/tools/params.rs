//! Typed tool parameters
//!
//! Each tool gets its own parameter record; [`ToolParams`] is the closed sum
//! over them. Select-style options are small enums whose labels are the exact
//! strings interpolated into prompts.

use crate::tools::kind::ToolKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error raised when user-supplied parameters do not fit a tool
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid value '{value}' for {field}")]
    InvalidOption { field: &'static str, value: String },

    #[error("{field} must be between 0 and 100, got {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("{field} must be a whole number, got '{value}'")]
    NotANumber { field: &'static str, value: String },
}

/// Declares a select option enum with its display labels
macro_rules! choice {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const FIELD: &'static str = $field;
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ParamError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.label().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| ParamError::InvalidOption {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }
    };
}

choice!(Sentiment, "sentiment" {
    Positive => "positive",
    Neutral => "neutral",
    Negative => "negative",
});

choice!(ScenarioContext, "context" {
    Current => "current",
    Historical => "historical",
    Future => "future",
    EconomicBoom => "economic boom",
    EconomicDownturn => "economic downturn",
});

choice!(SourceLeaning, "source" {
    Neutral => "neutral",
    LeftLeaning => "left-leaning",
    RightLeaning => "right-leaning",
    Academic => "academic",
    Tabloid => "tabloid",
});

choice!(Demographic, "demographic" {
    General => "general",
    Youth => "youth",
    Elderly => "elderly",
    Urban => "urban",
    Rural => "rural",
});

choice!(SocioEconomic, "socioeconomic" {
    MiddleClass => "middle class",
    UpperClass => "upper class",
    WorkingClass => "working class",
    Unemployed => "unemployed",
});

choice!(CulturalContext, "cultural" {
    Mainstream => "mainstream",
    Conservative => "conservative",
    Liberal => "liberal",
    Traditional => "traditional",
    Modern => "modern",
});

choice!(EmotionIntensity, "intensity" {
    Amplify => "amplify",
    Reduce => "reduce",
});

choice!(Perspective, "perspective" {
    FirstPerson => "first-person",
    ThirdPerson => "third-person",
    Antagonist => "antagonist",
    Protagonist => "protagonist",
});

choice!(ComplexityLevel, "level" {
    Simplified => "simplified",
    Complexified => "complexified",
});

choice!(Culture, "culture" {
    Western => "Western",
    Eastern => "Eastern",
    MiddleEastern => "Middle Eastern",
    African => "African",
    SouthAmerican => "South American",
});

/// Parameters of the What If? scenario tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    pub sentiment: Sentiment,
    pub context: ScenarioContext,
    pub source: SourceLeaning,
    pub demographic: Demographic,
    pub socioeconomic: SocioEconomic,
    pub cultural: CulturalContext,
}

/// A percentage slider value, always within 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Percent(u8);

impl Percent {
    pub const DEFAULT: Percent = Percent(50);

    pub fn new(field: &'static str, value: i64) -> Result<Self, ParamError> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= 100)
            .map(Percent)
            .ok_or(ParamError::OutOfRange { field, value })
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::DEFAULT
    }
}

impl TryFrom<i64> for Percent {
    type Error = ParamError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Percent::new("slider", value)
    }
}

impl From<Percent> for u8 {
    fn from(value: Percent) -> Self {
        value.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Slider settings of the Variable Adjustment tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableParams {
    pub accuracy: Percent,
    pub completeness: Percent,
    pub relevance: Percent,
    pub timeliness: Percent,
    pub consistency: Percent,
    pub objectivity: Percent,
    pub credibility: Percent,
    pub clarity: Percent,
    pub accessibility: Percent,
    pub value: Percent,
}

impl VariableParams {
    /// Form field names paired with their display labels, in prompt order
    pub const FIELDS: [(&'static str, &'static str); 10] = [
        ("accuracy", "Accuracy"),
        ("completeness", "Completeness"),
        ("relevance", "Relevance"),
        ("timeliness", "Timeliness"),
        ("consistency", "Consistency"),
        ("objectivity", "Objectivity"),
        ("credibility", "Credibility"),
        ("clarity", "Clarity"),
        ("accessibility", "Accessibility"),
        ("value", "Value"),
    ];

    /// Values in the same order as [`Self::FIELDS`]
    pub fn values(&self) -> [Percent; 10] {
        [
            self.accuracy,
            self.completeness,
            self.relevance,
            self.timeliness,
            self.consistency,
            self.objectivity,
            self.credibility,
            self.clarity,
            self.accessibility,
            self.value,
        ]
    }

    fn slot(&mut self, field: &str) -> Option<&mut Percent> {
        Some(match field {
            "accuracy" => &mut self.accuracy,
            "completeness" => &mut self.completeness,
            "relevance" => &mut self.relevance,
            "timeliness" => &mut self.timeliness,
            "consistency" => &mut self.consistency,
            "objectivity" => &mut self.objectivity,
            "credibility" => &mut self.credibility,
            "clarity" => &mut self.clarity,
            "accessibility" => &mut self.accessibility,
            "value" => &mut self.value,
            _ => return None,
        })
    }
}

/// Parameters for one tool invocation, one case per tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "kebab-case")]
pub enum ToolParams {
    WhatIf(ScenarioParams),
    Debate,
    Neutralizer,
    Emotion { intensity: EmotionIntensity },
    Perspective { perspective: Perspective },
    FactOpinion,
    Complexity { level: ComplexityLevel },
    Rhetoric,
    CrossCultural { culture: Culture },
    Variables(VariableParams),
}

impl ToolParams {
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolParams::WhatIf(_) => ToolKind::WhatIf,
            ToolParams::Debate => ToolKind::Debate,
            ToolParams::Neutralizer => ToolKind::Neutralizer,
            ToolParams::Emotion { .. } => ToolKind::Emotion,
            ToolParams::Perspective { .. } => ToolKind::Perspective,
            ToolParams::FactOpinion => ToolKind::FactOpinion,
            ToolParams::Complexity { .. } => ToolKind::Complexity,
            ToolParams::Rhetoric => ToolKind::Rhetoric,
            ToolParams::CrossCultural { .. } => ToolKind::CrossCultural,
            ToolParams::Variables(_) => ToolKind::Variables,
        }
    }

    /// Parameters with every control at its initial position
    pub fn defaults_for(kind: ToolKind) -> Self {
        match kind {
            ToolKind::WhatIf => ToolParams::WhatIf(ScenarioParams::default()),
            ToolKind::Debate => ToolParams::Debate,
            ToolKind::Neutralizer => ToolParams::Neutralizer,
            ToolKind::Emotion => ToolParams::Emotion {
                intensity: EmotionIntensity::default(),
            },
            ToolKind::Perspective => ToolParams::Perspective {
                perspective: Perspective::default(),
            },
            ToolKind::FactOpinion => ToolParams::FactOpinion,
            ToolKind::Complexity => ToolParams::Complexity {
                level: ComplexityLevel::default(),
            },
            ToolKind::Rhetoric => ToolParams::Rhetoric,
            ToolKind::CrossCultural => ToolParams::CrossCultural {
                culture: Culture::default(),
            },
            ToolKind::Variables => ToolParams::Variables(VariableParams::default()),
        }
    }

    /// Read parameters for `kind` from submitted form fields
    ///
    /// Missing fields keep their default; present fields must be valid.
    pub fn from_form(kind: ToolKind, form: &HashMap<String, String>) -> Result<Self, ParamError> {
        fn pick<T: FromStr<Err = ParamError> + Default>(
            form: &HashMap<String, String>,
            field: &str,
        ) -> Result<T, ParamError> {
            form.get(field).map_or_else(|| Ok(T::default()), |v| v.parse())
        }

        Ok(match kind {
            ToolKind::WhatIf => ToolParams::WhatIf(ScenarioParams {
                sentiment: pick(form, Sentiment::FIELD)?,
                context: pick(form, ScenarioContext::FIELD)?,
                source: pick(form, SourceLeaning::FIELD)?,
                demographic: pick(form, Demographic::FIELD)?,
                socioeconomic: pick(form, SocioEconomic::FIELD)?,
                cultural: pick(form, CulturalContext::FIELD)?,
            }),
            ToolKind::Emotion => ToolParams::Emotion {
                intensity: pick(form, EmotionIntensity::FIELD)?,
            },
            ToolKind::Perspective => ToolParams::Perspective {
                perspective: pick(form, Perspective::FIELD)?,
            },
            ToolKind::Complexity => ToolParams::Complexity {
                level: pick(form, ComplexityLevel::FIELD)?,
            },
            ToolKind::CrossCultural => ToolParams::CrossCultural {
                culture: pick(form, Culture::FIELD)?,
            },
            ToolKind::Variables => {
                let mut params = VariableParams::default();
                for (field, _) in VariableParams::FIELDS {
                    let Some(raw) = form.get(field) else { continue };
                    let value: i64 = raw.trim().parse().map_err(|_| ParamError::NotANumber {
                        field,
                        value: raw.clone(),
                    })?;
                    if let Some(slot) = params.slot(field) {
                        *slot = Percent::new(field, value)?;
                    }
                }
                ToolParams::Variables(params)
            }
            ToolKind::Debate
            | ToolKind::Neutralizer
            | ToolKind::FactOpinion
            | ToolKind::Rhetoric => ToolParams::defaults_for(kind),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_choice_labels_round_trip_through_from_str() {
        assert_eq!(
            "economic boom".parse::<ScenarioContext>(),
            Ok(ScenarioContext::EconomicBoom)
        );
        assert_eq!("Middle Eastern".parse::<Culture>(), Ok(Culture::MiddleEastern));
        assert_eq!(Perspective::ThirdPerson.to_string(), "third-person");
        assert!(matches!(
            "sideways".parse::<Perspective>(),
            Err(ParamError::InvalidOption { field: "perspective", .. })
        ));
    }

    #[test]
    fn test_defaults_are_first_option() {
        assert_eq!(Sentiment::default(), Sentiment::Positive);
        assert_eq!(Culture::default(), Culture::Western);
        assert_eq!(VariableParams::default().clarity.get(), 50);
    }

    #[test]
    fn test_from_form_reads_scenario_fields() {
        let params = ToolParams::from_form(
            ToolKind::WhatIf,
            &form(&[("sentiment", "negative"), ("socioeconomic", "working class")]),
        )
        .unwrap();
        let ToolParams::WhatIf(scenario) = params else {
            panic!("wrong case: {params:?}");
        };
        assert_eq!(scenario.sentiment, Sentiment::Negative);
        assert_eq!(scenario.socioeconomic, SocioEconomic::WorkingClass);
        assert_eq!(scenario.context, ScenarioContext::Current);
    }

    #[test]
    fn test_from_form_validates_sliders() {
        let ok = ToolParams::from_form(ToolKind::Variables, &form(&[("clarity", "90")])).unwrap();
        let ToolParams::Variables(vars) = ok else {
            panic!("wrong case");
        };
        assert_eq!(vars.clarity.get(), 90);
        assert_eq!(vars.accuracy.get(), 50);

        assert_eq!(
            ToolParams::from_form(ToolKind::Variables, &form(&[("value", "101")])),
            Err(ParamError::OutOfRange {
                field: "value",
                value: 101
            })
        );
        assert!(matches!(
            ToolParams::from_form(ToolKind::Variables, &form(&[("accuracy", "high")])),
            Err(ParamError::NotANumber { field: "accuracy", .. })
        ));
    }

    #[test]
    fn test_json_tagged_representation() {
        let params: ToolParams = serde_json::from_value(json!({
            "tool": "cross-cultural",
            "culture": "South American"
        }))
        .unwrap();
        assert_eq!(
            params,
            ToolParams::CrossCultural {
                culture: Culture::SouthAmerican
            }
        );

        let vars: ToolParams = serde_json::from_value(json!({
            "tool": "variables",
            "accuracy": 10
        }))
        .unwrap();
        assert_eq!(vars.kind(), ToolKind::Variables);

        let bad = serde_json::from_value::<ToolParams>(json!({
            "tool": "variables",
            "accuracy": 250
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_defaults_for_matches_kind() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolParams::defaults_for(*kind).kind(), *kind);
        }
    }
}
