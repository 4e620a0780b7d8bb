//! OAuth2 access-token management for the mailbox provider.
//!
//! `TokenManager` is the single owner of the mutable token state: it
//! caches the current access token with its expiry and refreshes it
//! through the token endpoint when a caller asks for a token that is
//! missing or about to expire.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::GmailConfig;
use crate::error::MailboxError;

const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Refresh this many seconds before the reported expiry, so a token
/// handed out is valid for the request that follows.
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct CachedToken {
    access_token: SecretString,
    expires_at: DateTime<Utc>,
}

/// Single-owner credential manager with refresh-on-expiry.
pub struct TokenManager {
    http: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
    refresh_token: SecretString,
    cached: Option<CachedToken>,
}

impl TokenManager {
    pub fn new(http: reqwest::Client, config: &GmailConfig) -> Self {
        Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_token: config.refresh_token.clone(),
            cached: None,
        }
    }

    /// Returns a valid access token, refreshing through the token
    /// endpoint when the cached one is stale.
    pub async fn access_token(&mut self) -> Result<String, MailboxError> {
        if let Some(cached) = &self.cached
            && is_fresh(cached.expires_at, Utc::now())
        {
            return Ok(cached.access_token.expose_secret().to_string());
        }
        self.refresh().await
    }

    async fn refresh(&mut self) -> Result<String, MailboxError> {
        tracing::debug!("Refreshing mailbox access token");

        let response = self
            .http
            .post(TOKEN_URI)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret()),
                ("refresh_token", self.refresh_token.expose_secret()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| MailboxError::Auth {
                reason: format!("token refresh request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailboxError::Auth {
                reason: format!("token refresh returned {status}: {body}"),
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| MailboxError::Auth {
            reason: format!("token refresh returned unexpected payload: {e}"),
        })?;

        let expires_in = token.expires_in.unwrap_or(3600);
        let access = token.access_token.clone();
        self.cached = Some(CachedToken {
            access_token: SecretString::from(token.access_token),
            expires_at: Utc::now() + Duration::seconds(expires_in),
        });

        tracing::debug!(expires_in, "Mailbox access token refreshed");
        Ok(access)
    }
}

/// A token is fresh while `now` is comfortably before its expiry.
fn is_fresh(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now + Duration::seconds(EXPIRY_SKEW_SECS) < expires_at
}
