use crate::domain::admin::{
    AdminCredential, CredentialVerifier, PlaintextVerifier, PASSWORD_HEADER, USERNAME_HEADER,
};
use crate::domain::analysis::AnalysisResult;
use crate::domain::error::{AppError, Result};
use crate::domain::feedback::{FeedbackRecord, FeedbackRow, FeedbackSubmission};
use crate::infrastructure::sheets::{
    TableResolver, ADMIN_USERS_TABLE, FEEDBACK_TABLE, PRODUCTS_TABLE,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";

/// Reads and writes the Feedback, Products and AdminUsers worksheets.
/// Every operation resolves its worksheet afresh.
pub struct FeedbackStore {
    resolver: Arc<dyn TableResolver>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl FeedbackStore {
    pub fn new(resolver: Arc<dyn TableResolver>) -> Self {
        Self::with_verifier(resolver, Arc::new(PlaintextVerifier))
    }

    pub fn with_verifier(
        resolver: Arc<dyn TableResolver>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self { resolver, verifier }
    }

    pub fn readiness(&self) -> Result<()> {
        self.resolver.readiness()
    }

    pub async fn list_product_names(&self) -> Result<Vec<String>> {
        let sheet = self.resolver.resolve_table(PRODUCTS_TABLE).await?;
        let mut names = sheet.col_values(1).await?;
        if !names.is_empty() {
            names.remove(0);
        }
        Ok(names)
    }

    /// Stamps the submission with the current UTC time and appends it.
    pub async fn append_feedback(
        &self,
        submission: FeedbackSubmission,
        analysis: AnalysisResult,
    ) -> Result<FeedbackRecord> {
        let sheet = self.resolver.resolve_table(FEEDBACK_TABLE).await?;
        let record = FeedbackRecord::new(submission, analysis, Utc::now());
        let row = record.to_row();
        info!(worksheet = sheet.title(), row = ?row, "Appending feedback row");
        sheet.append_row(row).await?;
        Ok(record)
    }

    pub async fn list_all_feedback(&self) -> Result<Vec<FeedbackRow>> {
        let sheet = self.resolver.resolve_table(FEEDBACK_TABLE).await?;
        Ok(records_from_values(sheet.get_all_values().await?))
    }

    /// Succeeds on the first stored credential that matches both fields. A
    /// missing field matches nothing.
    pub async fn authenticate(&self, username: Option<&str>, password: Option<&str>) -> Result<()> {
        let sheet = self.resolver.resolve_table(ADMIN_USERS_TABLE).await?;
        let stored = records_from_values(sheet.get_all_values().await?);
        let matched = match (username, password) {
            (Some(username), Some(password)) => stored
                .iter()
                .filter_map(admin_credential)
                .any(|credential| self.verifier.verify(&credential, username, password)),
            _ => false,
        };

        if matched {
            Ok(())
        } else {
            Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
        }
    }
}

/// Turns raw sheet values into header-keyed rows. The first row is the header.
fn records_from_values(values: Vec<Vec<Value>>) -> Vec<FeedbackRow> {
    let mut rows = values.into_iter();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(crate::domain::feedback::cell_text).collect(),
        None => return Vec::new(),
    };
    rows.map(|cells| FeedbackRow::from_cells(&headers, &cells))
        .collect()
}

fn admin_credential(row: &FeedbackRow) -> Option<AdminCredential> {
    Some(AdminCredential {
        username: row.text(USERNAME_HEADER)?,
        password: row.text(PASSWORD_HEADER)?,
    })
}
