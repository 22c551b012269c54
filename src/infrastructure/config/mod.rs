use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "PharmaFeedback.toml";
pub const CREDENTIALS_ENV: &str = "GCP_CREDENTIALS_JSON";
pub const DEFAULT_SPREADSHEET_NAME: &str = "PharmaFeedbackApp";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub bind_host: String,
    pub port: u16,
    pub spreadsheet_name: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 8080,
            spreadsheet_name: DEFAULT_SPREADSHEET_NAME.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

impl Settings {
    pub fn figment() -> Figment {
        // The credential blob is JSON and must not go through figment's
        // value parser, so it is read separately.
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::raw().only(&[
                "BIND_HOST",
                "PORT",
                "SPREADSHEET_NAME",
                "GEMINI_API_KEY",
                "GEMINI_MODEL",
                "GEMINI_BASE_URL",
            ]))
    }

    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        figment
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Invalid settings: {}", e)))
    }

    pub fn llm_config(&self) -> LLMConfig {
        LLMConfig {
            base_url: self.gemini_base_url.clone(),
            model: self.gemini_model.clone(),
            api_key: self.gemini_api_key.clone(),
            ..Default::default()
        }
    }
}

/// Raw credential blob from the environment, if set and non-blank.
pub fn credentials_blob() -> Option<String> {
    Env::var(CREDENTIALS_ENV)
}
