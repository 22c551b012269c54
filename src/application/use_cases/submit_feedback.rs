use crate::application::use_cases::annotator::AiAnnotator;
use crate::application::use_cases::feedback_store::FeedbackStore;
use crate::domain::error::Result;
use crate::domain::feedback::{FeedbackRecord, FeedbackSubmission};
use std::sync::Arc;
use tracing::{info, warn};

/// Annotates a submission and persists it. Annotation is best effort; only a
/// failed append fails the submission.
pub struct SubmitFeedbackUseCase {
    annotator: Arc<AiAnnotator>,
    store: Arc<FeedbackStore>,
}

impl SubmitFeedbackUseCase {
    pub fn new(annotator: Arc<AiAnnotator>, store: Arc<FeedbackStore>) -> Self {
        Self { annotator, store }
    }

    pub async fn execute(&self, submission: FeedbackSubmission) -> Result<FeedbackRecord> {
        info!(submission = ?submission, "Received feedback");

        let analysis = self
            .annotator
            .classify(
                submission.feedback_text.as_deref().unwrap_or_default(),
                submission.suggestion_text.as_deref().unwrap_or_default(),
            )
            .await;
        if analysis.is_annotated() {
            info!(
                category = %analysis.category,
                sentiment = analysis.sentiment,
                "AI analysis result"
            );
        } else {
            warn!(
                category = %analysis.category,
                error = %analysis.error,
                "Storing feedback without AI annotation"
            );
        }

        self.store.append_feedback(submission, analysis).await
    }
}
