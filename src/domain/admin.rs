use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const USERNAME_HEADER: &str = "Username";
pub const PASSWORD_HEADER: &str = "Password";

/// Login body. A field that is absent or not a JSON string is `None` and
/// never matches a stored credential.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "text_only")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "text_only")]
    pub password: Option<String>,
}

fn text_only<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminCredential {
    pub username: String,
    pub password: String,
}

/// Decides whether a supplied password matches a stored credential.
///
/// Stored passwords are plaintext today; a hashing strategy can be swapped in
/// here without changing the login handler.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, stored: &AdminCredential, username: &str, password: &str) -> bool;
}

/// Exact, case-sensitive comparison of both fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextVerifier;

impl CredentialVerifier for PlaintextVerifier {
    fn verify(&self, stored: &AdminCredential, username: &str, password: &str) -> bool {
        stored.username == username && stored.password == password
    }
}
