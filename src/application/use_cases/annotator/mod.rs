mod prompts;

use crate::domain::analysis::{AnalysisResult, FeedbackCategory};
use crate::domain::llm_config::LLMConfig;
use crate::domain::report::DEFAULT_REPORT_LANGUAGE;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::strip_code_fences;
use prompts::{build_classification_prompt, build_report_prompt};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

pub const MISSING_KEY_REASON: &str = "GEMINI_API_KEY not set.";
pub const REPORT_MISSING_KEY: &str = "Error: GEMINI_API_KEY not set.";
pub const REPORT_GENERATION_FAILED: &str = "Error: Could not generate report text from AI.";

/// Model reply for a classification. Both fields are optional so an absent
/// sentiment can be told apart from an explicit zero.
#[derive(Debug, Deserialize)]
struct ClassificationReply {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    sentiment: Option<f64>,
}

pub struct AiAnnotator {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    config: LLMConfig,
}

impl AiAnnotator {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>, config: LLMConfig) -> Self {
        Self { llm_client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key().is_some()
    }

    /// Categorises one submission. Never fails: every problem is folded into
    /// a sentinel result so the caller can still persist the feedback.
    pub async fn classify(&self, feedback_text: &str, suggestion_text: &str) -> AnalysisResult {
        if !self.is_configured() {
            return AnalysisResult::config_error(MISSING_KEY_REASON);
        }

        let prompt = build_classification_prompt(feedback_text, suggestion_text);
        let raw = match self.llm_client.generate(&self.config, &prompt).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "Classification request failed");
                return AnalysisResult::ai_error(err.to_string());
            }
        };

        let cleaned = strip_code_fences(&raw);
        match serde_json::from_str::<ClassificationReply>(&cleaned) {
            Ok(reply) => {
                let category = reply
                    .category
                    .as_deref()
                    .map(FeedbackCategory::from_label)
                    .unwrap_or(FeedbackCategory::ParseError);
                let sentiment = reply.sentiment.unwrap_or(0.0).clamp(-1.0, 1.0);
                AnalysisResult::success(category, sentiment)
            }
            Err(err) => {
                warn!(error = %err, reply = %cleaned, "Classification reply was not valid JSON");
                AnalysisResult::ai_error(err.to_string())
            }
        }
    }

    /// Writes the narrative for the executive report. Failures come back as
    /// sentinel text so they can be rendered into the document as-is.
    pub async fn synthesize_report(&self, records_text: &str, language: &str) -> String {
        if !self.is_configured() {
            return REPORT_MISSING_KEY.to_string();
        }

        let language = match language.trim() {
            "" => DEFAULT_REPORT_LANGUAGE,
            trimmed => trimmed,
        };
        let prompt = build_report_prompt(records_text, language);

        match self.llm_client.generate(&self.config, &prompt).await {
            Ok(text) => {
                info!(language, chars = text.len(), "Report narrative generated");
                text
            }
            Err(err) => {
                warn!(error = %err, "Report generation request failed");
                REPORT_GENERATION_FAILED.to_string()
            }
        }
    }
}
