use crate::application::use_cases::annotator::AiAnnotator;
use crate::application::use_cases::feedback_store::FeedbackStore;
use crate::domain::error::{AppError, Result};
use crate::domain::report::{report_language, ReportDocument, REPORT_HEADING};
use docx_rs::{Docx, Paragraph, Run, Style, StyleType};
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

pub const NO_DATA_MESSAGE: &str = "No feedback data available to generate a report.";
const HEADING_STYLE_ID: &str = "Heading1";

pub struct ReportBuilder {
    store: Arc<FeedbackStore>,
    annotator: Arc<AiAnnotator>,
}

impl ReportBuilder {
    pub fn new(store: Arc<FeedbackStore>, annotator: Arc<AiAnnotator>) -> Self {
        Self { store, annotator }
    }

    pub async fn build_report(&self, language: Option<&str>) -> Result<ReportDocument> {
        let language = report_language(language);

        let rows = self.store.list_all_feedback().await?;
        if rows.is_empty() {
            return Err(AppError::NotFound(NO_DATA_MESSAGE.to_string()));
        }

        let records_text = rows
            .iter()
            .map(|row| row.to_report_line())
            .collect::<Vec<_>>()
            .join("\n");
        let narrative = self
            .annotator
            .synthesize_report(&records_text, &language)
            .await;

        let bytes = render_docx(&narrative)?;
        info!(language = %language, records = rows.len(), bytes = bytes.len(), "Report generated");

        Ok(ReportDocument::new(&language, bytes))
    }
}

/// One heading, then one paragraph per non-blank line of the narrative.
pub fn render_docx(narrative: &str) -> Result<Vec<u8>> {
    let heading_style = Style::new(HEADING_STYLE_ID, StyleType::Paragraph)
        .name("Heading 1")
        .size(32)
        .bold();

    let mut docx = Docx::new().add_style(heading_style).add_paragraph(
        Paragraph::new()
            .style(HEADING_STYLE_ID)
            .add_run(Run::new().add_text(REPORT_HEADING)),
    );

    for line in narrative.lines() {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)));
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| AppError::Internal(format!("Failed to write report document: {}", e)))?;
    Ok(buffer.into_inner())
}
