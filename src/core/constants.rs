//! Fixed strings shared across the toolkit
//!
//! Message roles for the chat-completion wire format, the completion
//! delimiter and its fallbacks, and the user-facing copy that never changes.

/// Application title shown on every page
pub const APP_NAME: &str = "Trust In Media (TIM) IQ Playground Toolkit";

/// Message role constants
pub mod role {
    /// User role identifier
    pub const USER: &str = "user";

    /// System role identifier
    pub const SYSTEM: &str = "system";
}

/// Generation defaults
pub mod generation {
    /// System instruction sent ahead of every prompt
    pub const SYSTEM_PROMPT: &str =
        "You are an advanced text analysis and manipulation assistant.";

    /// Model used when the configuration names none
    pub const DEFAULT_MODEL: &str = "gpt-4o";

    /// Completion token ceiling
    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1800;
}

/// Completion layout
pub mod completion {
    /// Line separating the transformed text from its analysis
    pub const DELIMITER: &str = "\n---\n";

    /// Analysis placeholder when the model ignored the delimiter
    pub const NO_ANALYSIS: &str = "No separate analysis provided.";

    /// Same placeholder for tools that report explanations
    pub const NO_EXPLANATIONS: &str = "No separate explanations provided.";
}

/// User-visible messages
pub mod message {
    pub const EMPTY_INPUT: &str = "Please paste an article or URL into the text area.";
    pub const MISSING_CREDENTIAL: &str =
        "OpenAI API key not found. Please enter it in the sidebar.";
    pub const CREDENTIAL_SET: &str = "API key set for this session!";
    pub const LOGO_MISSING: &str = "Logo image not found.";
    pub const GENERATION_FAILED: &str =
        "There was an issue processing the text with the OpenAI API.";
}

/// Facts shown by the "Show Fun Fact" action
pub const FUN_FACTS: [&str; 10] = [
    "Did you know? The way information is presented can significantly alter your perception of it.",
    "Fun fact: Your brain processes negatively framed information differently than positive information.",
    "Interesting tidbit: The order in which facts are presented can change their perceived importance.",
    "Did you know? The same statistic can support opposite arguments depending on how it's framed.",
    "Fun fact: Your current emotional state can affect how you interpret neutral information.",
    "Interesting tidbit: The use of certain words can subtly influence your opinion without you noticing.",
    "Did you know? Information overload can lead to poorer decision-making, not better.",
    "Fun fact: Your pre-existing beliefs can cause you to interpret neutral information as supporting your view.",
    "Interesting tidbit: The context in which information is presented can completely change its meaning.",
    "Did you know? The source of information often matters more to people than the actual content.",
];
