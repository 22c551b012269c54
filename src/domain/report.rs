pub const REPORT_HEADING: &str = "Customer Feedback Report";
pub const DEFAULT_REPORT_LANGUAGE: &str = "english";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone)]
pub struct ReportDocument {
    /// May contain non-ASCII letters when the language does.
    pub filename: String,
    /// ASCII-only variant for clients that ignore extended filenames.
    pub fallback_filename: String,
    pub bytes: Vec<u8>,
}

impl ReportDocument {
    pub fn new(language: &str, bytes: Vec<u8>) -> Self {
        Self {
            filename: report_filename(&filename_tag(language, char::is_alphanumeric)),
            fallback_filename: report_filename(&filename_tag(language, |ch| {
                ch.is_ascii_alphanumeric()
            })),
            bytes,
        }
    }
}

/// Natural-language name handed to the model. Control characters are
/// removed and a blank value falls back to english.
pub fn report_language(language: Option<&str>) -> String {
    let cleaned: String = language
        .unwrap_or_default()
        .chars()
        .filter(|ch| !ch.is_control())
        .collect();
    match cleaned.trim() {
        "" => DEFAULT_REPORT_LANGUAGE.to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Filename-safe form of the language: `keep` characters plus `_` and `-`.
fn filename_tag(language: &str, keep: impl Fn(char) -> bool) -> String {
    let tag: String = language
        .chars()
        .filter(|ch| keep(*ch) || *ch == '_' || *ch == '-')
        .collect();
    if tag.is_empty() {
        DEFAULT_REPORT_LANGUAGE.to_string()
    } else {
        tag
    }
}

pub fn report_filename(language: &str) -> String {
    format!("Pharma_Feedback_Report_{}.docx", language)
}
