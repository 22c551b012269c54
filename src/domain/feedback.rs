use crate::domain::analysis::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Body of a feedback submission. Every field is optional; absent values are
/// stored as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub feedback_text: Option<String>,
    #[serde(default)]
    pub suggestion_text: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub submitted_at: String,
    pub product_name: String,
    pub feedback_text: String,
    pub suggestion_text: String,
    pub client_name: String,
    pub client_email: String,
    pub ai_category: String,
    pub ai_sentiment: f64,
    pub ai_error: String,
}

impl FeedbackRecord {
    pub fn new(
        submission: FeedbackSubmission,
        analysis: AnalysisResult,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            submitted_at: format_timestamp(submitted_at),
            product_name: submission.product_name.unwrap_or_default(),
            feedback_text: submission.feedback_text.unwrap_or_default(),
            suggestion_text: submission.suggestion_text.unwrap_or_default(),
            client_name: submission.client_name.unwrap_or_default(),
            client_email: submission.client_email.unwrap_or_default(),
            ai_category: analysis.category.as_str().to_string(),
            ai_sentiment: analysis.sentiment,
            ai_error: analysis.error,
        }
    }

    /// Cells in sheet column order.
    pub fn to_row(&self) -> Vec<Value> {
        vec![
            Value::from(self.submitted_at.clone()),
            Value::from(self.product_name.clone()),
            Value::from(self.feedback_text.clone()),
            Value::from(self.suggestion_text.clone()),
            Value::from(self.client_name.clone()),
            Value::from(self.client_email.clone()),
            Value::from(self.ai_category.clone()),
            Value::from(self.ai_sentiment),
            Value::from(self.ai_error.clone()),
        ]
    }
}

/// ISO-8601 UTC with microseconds and a trailing `Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// A stored sheet row keyed by the sheet's header row, in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedbackRow {
    fields: Vec<(String, Value)>,
}

impl FeedbackRow {
    pub fn from_cells(headers: &[String], cells: &[Value]) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let value = cells
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| Value::String(String::new()));
                (header.clone(), value)
            })
            .collect();
        Self { fields }
    }

    pub fn get(&self, header: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key == header)
            .map(|(_, value)| value)
    }

    /// Text form of a cell, matching how the sheet shows it.
    pub fn text(&self, header: &str) -> Option<String> {
        self.get(header).map(cell_text)
    }

    /// Single line listing every `header: value` pair. Line breaks inside a
    /// cell are folded into spaces so one record stays on one line.
    pub fn to_report_line(&self) -> String {
        self.fields
            .iter()
            .map(|(key, value)| format!("{}: {}", key, single_line(&cell_text(value))))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Serialize for FeedbackRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if float.fract() == 0.0 && float.abs() < 1e15 => {
                format!("{}", float as i64)
            }
            _ => number.to_string(),
        },
        Value::Bool(flag) => (if *flag { "TRUE" } else { "FALSE" }).to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::FeedbackCategory;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_missing_submission_fields_become_empty() {
        let submission: FeedbackSubmission =
            serde_json::from_value(json!({ "productName": "X" })).unwrap();
        let record = FeedbackRecord::new(
            submission,
            AnalysisResult::success(FeedbackCategory::Price, 0.5),
            Utc::now(),
        );
        assert_eq!(record.product_name, "X");
        assert_eq!(record.feedback_text, "");
        assert_eq!(record.client_email, "");
    }

    #[test]
    fn test_row_follows_column_order() {
        let submission = FeedbackSubmission {
            product_name: Some("X".to_string()),
            feedback_text: Some("Great".to_string()),
            suggestion_text: Some("None".to_string()),
            client_name: Some("A".to_string()),
            client_email: Some("a@x.com".to_string()),
        };
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let record = FeedbackRecord::new(
            submission,
            AnalysisResult::success(FeedbackCategory::Efficacy, 0.8),
            at,
        );
        let row = record.to_row();
        assert_eq!(row.len(), 9);
        assert_eq!(row[0], json!("2024-03-01T12:30:00.000000Z"));
        assert_eq!(row[1], json!("X"));
        assert_eq!(row[5], json!("a@x.com"));
        assert_eq!(row[6], json!("Efficacy"));
        assert_eq!(row[7], json!(0.8));
        assert_eq!(row[8], json!(""));
    }

    #[test]
    fn test_feedback_row_pads_short_rows() {
        let headers = vec!["Timestamp".to_string(), "Product".to_string(), "Error".to_string()];
        let row = FeedbackRow::from_cells(&headers, &[json!("t"), json!("X")]);
        assert_eq!(row.text("Error"), Some(String::new()));
        assert_eq!(row.to_report_line(), "Timestamp: t | Product: X | Error: ");
    }

    #[test]
    fn test_report_line_folds_multi_line_cells() {
        let headers = vec!["Timestamp".to_string(), "Feedback".to_string()];
        let row = FeedbackRow::from_cells(&headers, &[json!("t1"), json!("Line one\nLine two\r\nend")]);
        let line = row.to_report_line();
        assert_eq!(line, "Timestamp: t1 | Feedback: Line one Line two end");
        assert_eq!(line.lines().count(), 1);
        assert_eq!(row.text("Feedback").as_deref(), Some("Line one\nLine two\r\nend"));
    }

    #[test]
    fn test_feedback_row_serializes_in_header_order() {
        let headers = vec!["b".to_string(), "a".to_string()];
        let row = FeedbackRow::from_cells(&headers, &[json!(1), json!("x")]);
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"b":1,"a":"x"}"#);
    }

    #[test]
    fn test_cell_text_renders_whole_numbers_without_fraction() {
        assert_eq!(cell_text(&json!(1234.0)), "1234");
        assert_eq!(cell_text(&json!(1234)), "1234");
        assert_eq!(cell_text(&json!(-0.25)), "-0.25");
        assert_eq!(cell_text(&Value::Null), "");
    }
}
