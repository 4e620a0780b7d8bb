//! Configuration types.
//!
//! Everything comes from the environment at startup and is passed down
//! explicitly — no module reads env vars after construction.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// OAuth scopes requested for the mailbox: read message content and
/// modify labels (needed to clear the unread marker).
pub const DEFAULT_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/gmail.modify",
];

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Bound on a single language-model call.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Full scanner configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub gmail: GmailConfig,
    pub model: ModelConfig,
}

/// Mailbox provider credentials and scopes.
#[derive(Debug, Clone)]
pub struct GmailConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    /// Long-lived refresh token; access tokens are minted from it on demand.
    pub refresh_token: SecretString,
    pub scopes: Vec<String>,
}

/// Language model service configuration.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_key: SecretString,
    pub model: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Build configuration from environment variables.
    ///
    /// Required: `GMAIL_CLIENT_ID`, `GMAIL_CLIENT_SECRET`,
    /// `GMAIL_REFRESH_TOKEN`, `GEMINI_API_KEY`.
    /// Optional: `GMAIL_SCOPES` (comma-separated), `GEMINI_MODEL`,
    /// `GEMINI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gmail = GmailConfig {
            client_id: require_env("GMAIL_CLIENT_ID")?,
            client_secret: SecretString::from(require_env("GMAIL_CLIENT_SECRET")?),
            refresh_token: SecretString::from(require_env("GMAIL_REFRESH_TOKEN")?),
            scopes: std::env::var("GMAIL_SCOPES")
                .map(|raw| parse_scopes(&raw))
                .unwrap_or_else(|_| default_scopes()),
        };

        let timeout_secs: u64 = match std::env::var("GEMINI_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "GEMINI_TIMEOUT_SECS".to_string(),
                message: format!("expected a number of seconds, got {raw:?}"),
            })?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let model = ModelConfig {
            api_key: SecretString::from(require_env("GEMINI_API_KEY")?),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self { gmail, model })
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse a comma-separated scope list, ignoring empty entries.
fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}
