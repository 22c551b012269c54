use crate::domain::error::{AppError, Result};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

pub const SHEETS_SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The fields of a Google service-account key file that are needed to sign in.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct ServiceAccountCredentials {
    client_email: String,
    token_uri: String,
    signing_key: EncodingKey,
}

impl ServiceAccountCredentials {
    /// Parses the key file JSON, including the PEM private key.
    pub fn from_json(blob: &str) -> Result<Self> {
        let key: ServiceAccountKey = serde_json::from_str(blob).map_err(|e| {
            AppError::ConfigError(format!("Could not parse service account JSON: {}", e))
        })?;
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            AppError::ConfigError(format!("Invalid service account private key: {}", e))
        })?;

        Ok(Self {
            client_email: key.client_email,
            token_uri: key.token_uri,
            signing_key,
        })
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Signed RS256 JWT used in the token exchange.
    pub fn assertion(&self, issued_at: i64) -> Result<String> {
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: SHEETS_SCOPES.to_string(),
            aud: self.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| AppError::ConfigError(format!("Could not sign token request: {}", e)))
    }

    /// Exchanges a fresh assertion for an OAuth access token.
    pub async fn access_token(&self, http: &reqwest::Client) -> Result<String> {
        let assertion = self.assertion(Utc::now().timestamp())?;

        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| AppError::ConnectionError(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ConnectionError(format!(
                "Token request rejected ({}): {}",
                status, text
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AppError::ConnectionError(format!("Failed to parse token response: {}", e))
        })?;
        Ok(token.access_token)
    }
}
