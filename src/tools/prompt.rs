//! Prompt builder
//!
//! One fixed instruction template per tool. Every template ends by asking
//! for the transformed text and its analysis separated by `---` on a line
//! of its own, which is what [`crate::tools::split`] relies on.

use crate::tools::params::{ScenarioParams, ToolParams, VariableParams};
use std::fmt::Write;

/// Build the generation prompt for `params` applied to `text`
pub fn build(params: &ToolParams, text: &str) -> String {
    match params {
        ToolParams::WhatIf(scenario) => what_if(scenario, text),
        ToolParams::Debate => format!(
            "Assuming the role of a seasoned debater, create a comprehensive, logically sound, and persuasive counter-narrative to the following text:

{text}

Provide a well-structured counter-argument, and include an analysis of the rhetorical techniques and logical fallacies (if any) used in the original text. Separate the counter-argument and analysis with three dashes (---) on a new line."
        ),
        ToolParams::Neutralizer => format!(
            "Neutralize the following text by removing any bias, emotional language, or subjective statements.
Present only factual information in a neutral tone. If claims are made without evidence, indicate that they are unverified.
Maintain the overall structure and length of the original text as much as possible.
After neutralizing the text, provide a brief analysis of what changes were made and why.

Original text:
{text}

Please provide the neutralized version of the text, followed by an analysis of the changes made. Separate the neutralized text and analysis with three dashes (---) on a new line."
        ),
        ToolParams::Emotion { intensity } => format!(
            "Original Text: {text}

Please rewrite the text with a focus on {intensity} the emotional intensity. If the text is neutral, make it more emotionally charged, or tone it down to be more analytical. Include a brief analysis of the changes made. Separate the modified text and analysis with three dashes (---) on a new line."
        ),
        ToolParams::Perspective { perspective } => format!(
            "Original Text: {text}

Please rewrite the text from a {perspective} perspective. Change pronouns, restructure sentences, and adjust the tone to match the new perspective. Include a brief analysis of the changes made. Separate the modified text and analysis with three dashes (---) on a new line."
        ),
        ToolParams::FactOpinion => format!(
            "Analyze the following text and distinguish between factual statements and opinions. Highlight factual statements in one color and opinions in another. Provide explanations for the categorization.

Original text:
{text}

Please provide the analyzed text with explanations. Separate the analyzed text and explanations with three dashes (---) on a new line."
        ),
        ToolParams::Complexity { level } => format!(
            "Original Text: {text}

Please rewrite the text to make it {level}. Either simplify the content for a general audience or add more complexity and detail. Include a brief analysis of the changes made. Separate the modified text and analysis with three dashes (---) on a new line."
        ),
        ToolParams::Rhetoric => format!(
            "Analyze the following text for rhetorical devices. Highlight devices like metaphors, similes, hyperbole, etc., and provide explanations on how they impact the reader.

Original text:
{text}

Please provide the highlighted text with explanations. Separate the highlighted text and explanations with three dashes (---) on a new line."
        ),
        ToolParams::CrossCultural { culture } => format!(
            "Original Text: {text}

Please reinterpret the text from the perspective of {culture} culture. Adjust language, idioms, and cultural references to simulate how the text might be perceived in that cultural context. Include a brief analysis of the changes made. Separate the modified text and analysis with three dashes (---) on a new line."
        ),
        ToolParams::Variables(vars) => variables(vars, text),
    }
}

fn what_if(p: &ScenarioParams, text: &str) -> String {
    format!(
        "Original Text: {text}

Modify the text based on the following parameters:
Sentiment: {}
Context: {}
Source: {}
Demographic: {}
Socio-Economic Background: {}
Cultural Context: {}

Provide the modified text below, and include a brief analysis of how the information has been manipulated. Separate the modified text and analysis with three dashes (---) on a new line.",
        p.sentiment, p.context, p.source, p.demographic, p.socioeconomic, p.cultural
    )
}

fn variables(vars: &VariableParams, text: &str) -> String {
    let mut criteria = String::new();
    for ((_, label), value) in VariableParams::FIELDS.iter().zip(vars.values()) {
        // Writing into a String cannot fail.
        let _ = writeln!(criteria, "{label}: {value}%");
    }

    format!(
        "Original Text: {text}

Please rewrite the text based on the following criteria adjustments:
{criteria}
Modify the text to reflect these adjustments. For example, if accuracy is set to a low percentage, introduce some inaccuracies. If clarity is high, make the text more straightforward and easy to understand.

After rewriting the text, provide a brief analysis of the changes made and how they reflect the adjusted variables.

Separate the rewritten text and the analysis with three dashes (---) on a new line."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::kind::ToolKind;
    use crate::tools::params::{
        ComplexityLevel, Culture, EmotionIntensity, Percent, Sentiment, SocioEconomic,
    };

    #[test]
    fn test_every_template_embeds_text_and_asks_for_delimiter() {
        for kind in ToolKind::ALL {
            let prompt = build(&ToolParams::defaults_for(*kind), "THE ARTICLE");
            assert!(prompt.contains("THE ARTICLE"), "{kind:?} drops the text");
            assert!(
                prompt.contains("three dashes (---) on a new line"),
                "{kind:?} omits the delimiter instruction"
            );
        }
    }

    #[test]
    fn test_what_if_interpolates_every_parameter() {
        let params = ToolParams::WhatIf(ScenarioParams {
            sentiment: Sentiment::Negative,
            socioeconomic: SocioEconomic::UpperClass,
            ..ScenarioParams::default()
        });
        let prompt = build(&params, "x");
        assert!(prompt.contains("Sentiment: negative\n"));
        assert!(prompt.contains("Context: current\n"));
        assert!(prompt.contains("Source: neutral\n"));
        assert!(prompt.contains("Demographic: general\n"));
        assert!(prompt.contains("Socio-Economic Background: upper class\n"));
        assert!(prompt.contains("Cultural Context: mainstream\n"));
    }

    #[test]
    fn test_select_tools_use_option_labels() {
        let emotion = build(
            &ToolParams::Emotion {
                intensity: EmotionIntensity::Reduce,
            },
            "x",
        );
        assert!(emotion.contains("with a focus on reduce the emotional intensity"));

        let culture = build(
            &ToolParams::CrossCultural {
                culture: Culture::MiddleEastern,
            },
            "x",
        );
        assert!(culture.contains("perspective of Middle Eastern culture"));

        let complexity = build(
            &ToolParams::Complexity {
                level: ComplexityLevel::Complexified,
            },
            "x",
        );
        assert!(complexity.contains("to make it complexified."));
    }

    #[test]
    fn test_variables_lists_all_sliders_as_percentages() {
        let mut vars = VariableParams::default();
        vars.accuracy = Percent::new("accuracy", 5).unwrap();
        let prompt = build(&ToolParams::Variables(vars), "x");
        assert!(prompt.contains("Accuracy: 5%\nCompleteness: 50%\n"));
        assert!(prompt.contains("Value: 50%\n\nModify the text"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let params = ToolParams::defaults_for(ToolKind::Perspective);
        assert_eq!(build(&params, "same"), build(&params, "same"));
    }
}
