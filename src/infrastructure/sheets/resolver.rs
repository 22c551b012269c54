use super::auth::ServiceAccountCredentials;
use super::client::{GoogleSheetsApi, GoogleWorksheet};
use super::{TableResolver, Worksheet};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::CREDENTIALS_ENV;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Opens worksheets of one named spreadsheet with a service account.
///
/// Credentials are parsed once at construction. When they are missing or
/// malformed the resolver stays disabled and every call reports the same
/// reason. Each successful call performs a fresh token exchange and lookup.
pub struct GoogleSheetsResolver {
    credentials: std::result::Result<ServiceAccountCredentials, String>,
    spreadsheet_name: String,
    api: GoogleSheetsApi,
}

impl GoogleSheetsResolver {
    pub fn from_blob(blob: Option<&str>, spreadsheet_name: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Ok(Self::with_api(blob, spreadsheet_name, GoogleSheetsApi::new(http)?))
    }

    pub fn with_api(blob: Option<&str>, spreadsheet_name: &str, api: GoogleSheetsApi) -> Self {
        let credentials = match blob {
            None => Err(format!("{} is not set", CREDENTIALS_ENV)),
            Some(raw) => ServiceAccountCredentials::from_json(raw).map_err(|err| match err {
                AppError::ConfigError(reason) => reason,
                other => other.to_string(),
            }),
        };
        if let Err(reason) = &credentials {
            warn!(reason = %reason, "Spreadsheet store disabled");
        }

        Self {
            credentials,
            spreadsheet_name: spreadsheet_name.to_string(),
            api,
        }
    }

    pub fn spreadsheet_name(&self) -> &str {
        &self.spreadsheet_name
    }

    fn credentials(&self) -> Result<&ServiceAccountCredentials> {
        self.credentials
            .as_ref()
            .map_err(|reason| AppError::ConfigError(reason.clone()))
    }
}

#[async_trait]
impl TableResolver for GoogleSheetsResolver {
    async fn resolve_table(&self, name: &str) -> Result<Box<dyn Worksheet>> {
        let credentials = self.credentials()?;
        let token = credentials.access_token(self.api.http()).await?;

        let spreadsheet_id = self
            .api
            .find_spreadsheet(&token, &self.spreadsheet_name)
            .await?
            .ok_or_else(|| {
                AppError::ConnectionError(format!(
                    "Spreadsheet '{}' was not found or is not shared with {}",
                    self.spreadsheet_name,
                    credentials.client_email()
                ))
            })?;

        let titles = self.api.worksheet_titles(&token, &spreadsheet_id).await?;
        if !titles.iter().any(|title| title == name) {
            return Err(AppError::ConnectionError(format!(
                "Worksheet '{}' was not found in spreadsheet '{}'",
                name, self.spreadsheet_name
            )));
        }

        debug!(worksheet = name, spreadsheet = %self.spreadsheet_name, "Opened worksheet");
        Ok(Box::new(GoogleWorksheet::new(
            self.api.clone(),
            token,
            spreadsheet_id,
            name,
        )))
    }

    fn readiness(&self) -> Result<()> {
        self.credentials().map(|_| ())
    }
}
