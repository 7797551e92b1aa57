//! Login response models

use super::stringified;
use serde::Deserialize;

/// Account the credentials have access to
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthAccount {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subdomain: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub timezone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuthUser {
    #[serde(default, with = "stringified")]
    pub id: i64,
    #[serde(default)]
    pub language: String,
}

/// Body of `POST /private/api/auth.php?type=json`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub auth: bool,
    #[serde(default)]
    pub accounts: Vec<AuthAccount>,
    #[serde(default)]
    pub user: Option<AuthUser>,
    #[serde(default, with = "stringified")]
    pub server_time: i64,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_code")]
    pub error_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthEnvelope {
    pub response: AuthResponse,
}

fn lenient_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
