pub mod annotator;
pub mod feedback_store;
pub mod report_builder;
pub mod submit_feedback;
