use super::Worksheet;
use crate::domain::error::{AppError, Result};
use crate::domain::feedback::cell_text;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

pub const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/";
pub const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Thin REST client for the Drive and Sheets endpoints the store needs.
#[derive(Clone)]
pub struct GoogleSheetsApi {
    http: reqwest::Client,
    sheets_base: Url,
    drive_files: Url,
}

impl GoogleSheetsApi {
    pub fn new(http: reqwest::Client) -> Result<Self> {
        Self::with_endpoints(http, SHEETS_BASE_URL, DRIVE_FILES_URL)
    }

    /// Same client against other Sheets and Drive hosts.
    pub fn with_endpoints(http: reqwest::Client, sheets_base: &str, drive_files: &str) -> Result<Self> {
        Ok(Self {
            http,
            sheets_base: parse_url(sheets_base)?,
            drive_files: parse_url(drive_files)?,
        })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Id of the first spreadsheet visible to the service account with this exact name.
    pub async fn find_spreadsheet(&self, token: &str, name: &str) -> Result<Option<String>> {
        let url = self.drive_search_url(name);
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;
        let list: DriveFileList = decode(response, "Spreadsheet lookup").await?;
        Ok(list.files.into_iter().next().map(|file| file.id))
    }

    pub async fn worksheet_titles(&self, token: &str, spreadsheet_id: &str) -> Result<Vec<String>> {
        let mut url = self.spreadsheet_url(spreadsheet_id, &[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;
        let metadata: SpreadsheetMetadata = decode(response, "Worksheet lookup").await?;
        Ok(metadata
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect())
    }

    fn drive_search_url(&self, name: &str) -> Url {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            escape_drive_literal(name),
            SPREADSHEET_MIME_TYPE
        );
        let mut url = self.drive_files.clone();
        url.query_pairs_mut()
            .append_pair("q", &query)
            .append_pair("fields", "files(id,name)")
            .append_pair("supportsAllDrives", "true")
            .append_pair("includeItemsFromAllDrives", "true");
        url
    }

    fn spreadsheet_url(&self, spreadsheet_id: &str, tail: &[&str]) -> Result<Url> {
        let mut url = self.sheets_base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Sheets base URL cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", spreadsheet_id])
            .extend(tail);
        Ok(url)
    }
}

/// Handle on one worksheet, valid for the access token it was opened with.
pub struct GoogleWorksheet {
    api: GoogleSheetsApi,
    token: String,
    spreadsheet_id: String,
    title: String,
}

impl GoogleWorksheet {
    pub fn new(api: GoogleSheetsApi, token: String, spreadsheet_id: String, title: &str) -> Self {
        Self {
            api,
            token,
            spreadsheet_id,
            title: title.to_string(),
        }
    }

    async fn get_values(&self, range: &str, major_dimension: &str, render: &str) -> Result<Vec<Vec<Value>>> {
        let mut url = self
            .api
            .spreadsheet_url(&self.spreadsheet_id, &["values", range])?;
        url.query_pairs_mut()
            .append_pair("majorDimension", major_dimension)
            .append_pair("valueRenderOption", render);
        let response = self
            .api
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(transport_error)?;
        let range: ValueRange = decode(response, "Reading values").await?;
        Ok(range.values)
    }
}

#[async_trait]
impl Worksheet for GoogleWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    async fn col_values(&self, column: usize) -> Result<Vec<String>> {
        let letter = column_letter(column);
        let range = a1_range(&self.title, &format!("{}:{}", letter, letter));
        let columns = self.get_values(&range, "COLUMNS", "FORMATTED_VALUE").await?;
        Ok(columns
            .into_iter()
            .next()
            .unwrap_or_default()
            .iter()
            .map(cell_text)
            .collect())
    }

    async fn get_all_values(&self) -> Result<Vec<Vec<Value>>> {
        let range = a1_range(&self.title, "A:ZZ");
        self.get_values(&range, "ROWS", "UNFORMATTED_VALUE").await
    }

    async fn append_row(&self, row: Vec<Value>) -> Result<()> {
        let target = format!("{}:append", a1_range(&self.title, "A1"));
        let mut url = self
            .api
            .spreadsheet_url(&self.spreadsheet_id, &["values", &target])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        let response = self
            .api
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "majorDimension": "ROWS", "values": [row] }))
            .send()
            .await
            .map_err(transport_error)?;
        decode::<Value>(response, "Appending row").await?;
        Ok(())
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| AppError::Internal(format!("Invalid URL {}: {}", raw, e)))
}

fn transport_error(err: reqwest::Error) -> AppError {
    AppError::ConnectionError(format!("Spreadsheet request failed: {}", err))
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(AppError::ConnectionError(format!(
            "{} failed ({}): {}",
            what, status, text
        )));
    }
    response
        .json()
        .await
        .map_err(|e| AppError::ConnectionError(format!("{} returned an unreadable body: {}", what, e)))
}

/// `'Title'!range` with single quotes in the title doubled.
pub fn a1_range(title: &str, range: &str) -> String {
    format!("'{}'!{}", title.replace('\'', "''"), range)
}

/// 1 -> A, 26 -> Z, 27 -> AA.
pub fn column_letter(column: usize) -> String {
    let mut n = column.max(1);
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn escape_drive_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
