//! Gmail REST implementation of `MailboxProvider`.
//!
//! Talks to the Gmail API v1 directly over HTTP. Every call acquires a
//! bearer token from the `TokenManager`, which refreshes it on expiry.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::auth::TokenManager;
use crate::config::GmailConfig;
use crate::error::MailboxError;
use crate::mailbox::{MailboxProvider, RawMessage};

const BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMessagesResponse {
    #[serde(default)]
    messages: Vec<MessageStub>,
}

#[derive(Debug, Deserialize)]
struct MessageStub {
    id: String,
}

/// Gmail-backed mailbox.
pub struct GmailMailbox {
    http: reqwest::Client,
    tokens: Mutex<TokenManager>,
}

impl GmailMailbox {
    pub fn new(config: &GmailConfig) -> Self {
        let http = reqwest::Client::new();
        let tokens = Mutex::new(TokenManager::new(http.clone(), config));
        Self { http, tokens }
    }

    /// Scoped token acquisition: the manager is locked only long enough
    /// to hand out (or refresh) one token.
    async fn bearer(&self) -> Result<String, MailboxError> {
        self.tokens.lock().await.access_token().await
    }

    async fn check(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, MailboxError> {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            return Err(MailboxError::Auth {
                reason: format!("{operation} rejected the access token: {body}"),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailboxError::Api {
                operation,
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl MailboxProvider for GmailMailbox {
    async fn list_unread(&self) -> Result<Vec<String>, MailboxError> {
        let token = self.bearer().await?;

        let response = self
            .http
            .get(format!("{BASE_URL}/messages"))
            .bearer_auth(&token)
            .query(&[("labelIds", "INBOX"), ("q", "is:unread")])
            .send()
            .await
            .map_err(|e| MailboxError::Request {
                operation: "list",
                reason: e.to_string(),
            })?;

        let response = Self::check(response, "list").await?;
        let list: ListMessagesResponse =
            response.json().await.map_err(|e| MailboxError::Request {
                operation: "list",
                reason: format!("unexpected payload: {e}"),
            })?;

        Ok(list.messages.into_iter().map(|m| m.id).collect())
    }

    async fn get(&self, id: &str) -> Result<RawMessage, MailboxError> {
        let token = self.bearer().await?;

        let response = self
            .http
            .get(format!("{BASE_URL}/messages/{id}"))
            .bearer_auth(&token)
            .query(&[("format", "full")])
            .send()
            .await
            .map_err(|e| MailboxError::Request {
                operation: "get",
                reason: e.to_string(),
            })?;

        let response = Self::check(response, "get").await?;
        response.json().await.map_err(|e| MailboxError::Request {
            operation: "get",
            reason: format!("unexpected payload: {e}"),
        })
    }

    async fn mark_read(&self, id: &str) -> Result<(), MailboxError> {
        let token = self.bearer().await?;

        let response = self
            .http
            .post(format!("{BASE_URL}/messages/{id}/modify"))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "removeLabelIds": ["UNREAD"] }))
            .send()
            .await
            .map_err(|e| MailboxError::Request {
                operation: "modify",
                reason: e.to_string(),
            })?;

        Self::check(response, "modify").await?;
        tracing::debug!(id, "Marked message read");
        Ok(())
    }
}
