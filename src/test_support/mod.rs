//! In-memory doubles for the spreadsheet and the language model.

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::sheets::{TableResolver, Worksheet};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

mod google_stub;

pub use google_stub::{GoogleStub, STUB_TOKEN};

const TEST_PRIVATE_KEY: &str = include_str!("service_account_test_key.pem");
pub const TEST_CLIENT_EMAIL: &str = "feedback-bot@test-project.iam.gserviceaccount.com";

pub fn service_account_json() -> String {
    service_account_json_with_token_uri("https://oauth2.googleapis.com/token")
}

pub fn service_account_json_with_token_uri(token_uri: &str) -> String {
    serde_json::json!({
        "type": "service_account",
        "project_id": "test-project",
        "private_key_id": "0123456789abcdef",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": TEST_CLIENT_EMAIL,
        "token_uri": token_uri,
    })
    .to_string()
}

type Tables = Arc<Mutex<HashMap<String, Vec<Vec<Value>>>>>;

/// Resolver over named in-memory tables. Unknown names behave like a missing
/// worksheet; `disabled` behaves like absent credentials.
#[derive(Clone, Default)]
pub struct InMemoryResolver {
    tables: Tables,
    disabled: Option<String>,
    resolve_calls: Arc<AtomicUsize>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled(reason: &str) -> Self {
        Self {
            disabled: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn with_table(self, name: &str, rows: Vec<Vec<Value>>) -> Self {
        self.tables.lock().unwrap().insert(name.to_string(), rows);
        self
    }

    pub fn push_row(&self, name: &str, row: Vec<Value>) {
        self.tables
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push(row);
    }

    pub fn rows(&self, name: &str) -> Vec<Vec<Value>> {
        self.tables
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TableResolver for InMemoryResolver {
    async fn resolve_table(&self, name: &str) -> Result<Box<dyn Worksheet>> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.disabled {
            return Err(AppError::ConfigError(reason.clone()));
        }
        if !self.tables.lock().unwrap().contains_key(name) {
            return Err(AppError::ConnectionError(format!(
                "Worksheet '{}' was not found in spreadsheet 'PharmaFeedbackApp'",
                name
            )));
        }
        Ok(Box::new(InMemoryWorksheet {
            title: name.to_string(),
            tables: self.tables.clone(),
        }))
    }

    fn readiness(&self) -> Result<()> {
        match &self.disabled {
            Some(reason) => Err(AppError::ConfigError(reason.clone())),
            None => Ok(()),
        }
    }
}

pub struct InMemoryWorksheet {
    title: String,
    tables: Tables,
}

#[async_trait]
impl Worksheet for InMemoryWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    async fn col_values(&self, column: usize) -> Result<Vec<String>> {
        let tables = self.tables.lock().unwrap();
        let rows = tables.get(&self.title).cloned().unwrap_or_default();
        let mut values: Vec<String> = rows
            .iter()
            .map(|row| {
                row.get(column - 1)
                    .map(crate::domain::feedback::cell_text)
                    .unwrap_or_default()
            })
            .collect();
        while values.last().map(|v| v.is_empty()).unwrap_or(false) {
            values.pop();
        }
        Ok(values)
    }

    async fn get_all_values(&self) -> Result<Vec<Vec<Value>>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .get(&self.title)
            .cloned()
            .unwrap_or_default())
    }

    async fn append_row(&self, row: Vec<Value>) -> Result<()> {
        self.tables
            .lock()
            .unwrap()
            .entry(self.title.clone())
            .or_default()
            .push(row);
        Ok(())
    }
}

/// Language model double that returns a fixed reply or failure and records
/// every prompt it receives.
#[derive(Clone)]
pub struct ScriptedLlm {
    reply: std::result::Result<String, String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LLMClient for ScriptedLlm {
    async fn generate(&self, _config: &LLMConfig, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(AppError::LLMError)
    }
}

pub fn keyed_llm_config() -> LLMConfig {
    LLMConfig {
        api_key: Some("test-key".to_string()),
        ..Default::default()
    }
}

pub fn text_row(cells: &[&str]) -> Vec<Value> {
    cells.iter().map(|cell| Value::from(*cell)).collect()
}
