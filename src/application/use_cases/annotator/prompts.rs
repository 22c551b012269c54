use crate::domain::analysis::FeedbackCategory;

pub fn build_classification_prompt(feedback_text: &str, suggestion_text: &str) -> String {
    format!(
        "Analyze the following customer feedback. Provide a JSON object with two keys: \"category\" and \"sentiment\".\n\
The \"category\" must be one of the following: [{categories}].\n\
The \"sentiment\" must be a number between -1.0 (very negative) and 1.0 (very positive).\n\
Feedback to analyze: \"Feedback: {feedback}. Suggestion: {suggestion}\"",
        categories = FeedbackCategory::prompt_list(),
        feedback = feedback_text,
        suggestion = suggestion_text,
    )
}

pub fn build_report_prompt(records_text: &str, language: &str) -> String {
    format!(
        "You are a senior customer-insights analyst for a pharmaceutical company. \
Read the customer feedback records below and write an executive summary report in {language}.\n\
Structure the report with exactly these four sections, each starting on its own line with the section title:\n\
1. Overall Summary\n\
2. Key Positive Themes\n\
3. Key Areas for Improvement\n\
4. Actionable Recommendations\n\
Write plain text without Markdown tables or code fences. Use the whole report language {language}, including the section titles.\n\n\
Feedback records:\n{records}",
        language = language,
        records = records_text,
    )
}
