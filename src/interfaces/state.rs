use crate::application::{AiAnnotator, FeedbackStore, ReportBuilder, SubmitFeedbackUseCase};
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::sheets::TableResolver;
use std::sync::Arc;

pub struct AppState {
    pub store: Arc<FeedbackStore>,
    pub annotator: Arc<AiAnnotator>,
    pub submit_feedback_use_case: SubmitFeedbackUseCase,
    pub report_builder: ReportBuilder,
}

impl AppState {
    pub fn new(
        resolver: Arc<dyn TableResolver>,
        llm_client: Arc<dyn LLMClient + Send + Sync>,
        llm_config: LLMConfig,
    ) -> Self {
        let store = Arc::new(FeedbackStore::new(resolver));
        let annotator = Arc::new(AiAnnotator::new(llm_client, llm_config));

        Self {
            submit_feedback_use_case: SubmitFeedbackUseCase::new(annotator.clone(), store.clone()),
            report_builder: ReportBuilder::new(store.clone(), annotator.clone()),
            store,
            annotator,
        }
    }
}
