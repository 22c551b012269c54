pub mod use_cases;

pub use use_cases::annotator::AiAnnotator;
pub use use_cases::feedback_store::FeedbackStore;
pub use use_cases::report_builder::ReportBuilder;
pub use use_cases::submit_feedback::SubmitFeedbackUseCase;
