use serde::{Serialize, Serializer};
use std::fmt;

/// Category assigned to a piece of feedback.
///
/// The first nine variants are the closed set the model is asked to choose
/// from. The sentinel variants record why no real category was produced, and
/// `Unrecognized` keeps whatever the model returned outside the known set so
/// the stored value matches the model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackCategory {
    Packaging,
    Formula,
    Color,
    Smell,
    Efficacy,
    SideEffect,
    Price,
    Documentation,
    Other,
    ConfigError,
    AiError,
    ParseError,
    Unrecognized(String),
}

impl FeedbackCategory {
    pub const KNOWN: [FeedbackCategory; 9] = [
        FeedbackCategory::Packaging,
        FeedbackCategory::Formula,
        FeedbackCategory::Color,
        FeedbackCategory::Smell,
        FeedbackCategory::Efficacy,
        FeedbackCategory::SideEffect,
        FeedbackCategory::Price,
        FeedbackCategory::Documentation,
        FeedbackCategory::Other,
    ];

    /// Maps a model-supplied label onto the closed set. Matching ignores case
    /// and surrounding whitespace.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        Self::KNOWN
            .iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| FeedbackCategory::Unrecognized(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            FeedbackCategory::Packaging => "Packaging",
            FeedbackCategory::Formula => "Formula",
            FeedbackCategory::Color => "Color",
            FeedbackCategory::Smell => "Smell",
            FeedbackCategory::Efficacy => "Efficacy",
            FeedbackCategory::SideEffect => "Side Effect",
            FeedbackCategory::Price => "Price",
            FeedbackCategory::Documentation => "Documentation",
            FeedbackCategory::Other => "Other",
            FeedbackCategory::ConfigError => "Config Error",
            FeedbackCategory::AiError => "AI_Error",
            FeedbackCategory::ParseError => "Parse Error",
            FeedbackCategory::Unrecognized(raw) => raw,
        }
    }

    /// Comma separated list used inside prompts.
    pub fn prompt_list() -> String {
        Self::KNOWN
            .iter()
            .map(FeedbackCategory::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FeedbackCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub category: FeedbackCategory,
    pub sentiment: f64,
    pub error: String,
}

impl AnalysisResult {
    pub fn success(category: FeedbackCategory, sentiment: f64) -> Self {
        Self {
            category,
            sentiment,
            error: String::new(),
        }
    }

    pub fn config_error(reason: impl Into<String>) -> Self {
        Self {
            category: FeedbackCategory::ConfigError,
            sentiment: 0.0,
            error: reason.into(),
        }
    }

    pub fn ai_error(reason: impl Into<String>) -> Self {
        Self {
            category: FeedbackCategory::AiError,
            sentiment: 0.0,
            error: reason.into(),
        }
    }

    pub fn is_annotated(&self) -> bool {
        self.error.is_empty()
    }
}
