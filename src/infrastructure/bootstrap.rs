use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::error::Result;
use crate::infrastructure::config::{credentials_blob, Settings};
use crate::infrastructure::llm_clients::{GeminiClient, LLMClient};
use crate::infrastructure::sheets::{GoogleSheetsResolver, TableResolver};
use crate::interfaces::state::AppState;

/// Builds the shared state from loaded settings. Missing credentials or a
/// missing API key do not stop startup; they surface per request.
pub fn setup(settings: &Settings) -> Result<Arc<AppState>> {
    let blob = credentials_blob();
    let resolver = GoogleSheetsResolver::from_blob(blob.as_deref(), &settings.spreadsheet_name)?;
    match resolver.readiness() {
        Ok(()) => info!(
            spreadsheet = %resolver.spreadsheet_name(),
            "Spreadsheet credentials loaded"
        ),
        Err(err) => warn!(error = %err, "Spreadsheet access disabled"),
    }

    let llm_config = settings.llm_config();
    if llm_config.api_key().is_none() {
        warn!("GEMINI_API_KEY not set; feedback will be stored without AI annotation");
    } else {
        info!(model = %llm_config.model, "Gemini annotation enabled");
    }

    let resolver: Arc<dyn TableResolver> = Arc::new(resolver);
    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(GeminiClient::new());

    Ok(Arc::new(AppState::new(resolver, llm_client, llm_config)))
}
