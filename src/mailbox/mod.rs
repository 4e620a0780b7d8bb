//! Mailbox provider interface and message types.
//!
//! `MailboxProvider` is the seam between the scanner and the real
//! mailbox: pure I/O, no content logic. The message shapes mirror the
//! provider's nested JSON resource — headers plus a body tree in which
//! every part carries a MIME type and base64-encoded payload, and may
//! carry child parts of the same shape.

pub mod gmail;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::MailboxError;

// ── Message shapes ──────────────────────────────────────────────────

/// A full message as returned by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    pub id: String,
    #[serde(default)]
    pub payload: Option<MessagePart>,
}

/// One node of the body tree. Leaf parts carry data; multipart
/// containers carry child parts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body: Option<PartBody>,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

/// A single name/value message header.
#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Payload of a leaf part. `data` is URL-safe base64, left encoded at
/// this layer — decoding belongs to the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartBody {
    #[serde(default)]
    pub data: Option<String>,
}

impl RawMessage {
    /// Value of the first top-level header with the given name,
    /// case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .as_ref()?
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

// ── Provider trait ──────────────────────────────────────────────────

/// Mailbox operations the scanner needs. Implementations handle
/// authentication and transport; callers never see either.
#[async_trait]
pub trait MailboxProvider: Send + Sync {
    /// IDs of unread inbox messages.
    async fn list_unread(&self) -> Result<Vec<String>, MailboxError>;

    /// Fetch a full message by ID.
    async fn get(&self, id: &str) -> Result<RawMessage, MailboxError>;

    /// Remove the unread marker from a message.
    async fn mark_read(&self, id: &str) -> Result<(), MailboxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_message_deserializes_from_provider_json() {
        let json = r#"{
            "id": "msg123",
            "payload": {
                "mimeType": "multipart/alternative",
                "headers": [
                    {"name": "From", "value": "Jane Doe <jane@example.com>"},
                    {"name": "Subject", "value": "Status update"}
                ],
                "parts": [
                    {"mimeType": "text/plain", "body": {"data": "SGVsbG8"}},
                    {"mimeType": "text/html", "body": {"data": "PGI-SGVsbG88L2I-"}}
                ]
            }
        }"#;

        let message: RawMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.id, "msg123");

        let payload = message.payload.as_ref().unwrap();
        assert_eq!(payload.mime_type, "multipart/alternative");
        assert_eq!(payload.parts.len(), 2);
        assert_eq!(payload.parts[0].mime_type, "text/plain");
        assert_eq!(
            payload.parts[0].body.as_ref().unwrap().data.as_deref(),
            Some("SGVsbG8")
        );
    }

    #[test]
    fn raw_message_tolerates_missing_payload() {
        let message: RawMessage = serde_json::from_str(r#"{"id": "m1"}"#).unwrap();
        assert!(message.payload.is_none());
        assert_eq!(message.header("From"), None);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let json = r#"{
            "id": "m1",
            "payload": {
                "mimeType": "text/plain",
                "headers": [{"name": "From", "value": "alice@example.com"}]
            }
        }"#;
        let message: RawMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.header("from"), Some("alice@example.com"));
        assert_eq!(message.header("FROM"), Some("alice@example.com"));
        assert_eq!(message.header("Reply-To"), None);
    }

    #[test]
    fn header_lookup_returns_first_match() {
        let json = r#"{
            "id": "m1",
            "payload": {
                "mimeType": "text/plain",
                "headers": [
                    {"name": "Received", "value": "first hop"},
                    {"name": "Received", "value": "second hop"}
                ]
            }
        }"#;
        let message: RawMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.header("Received"), Some("first hop"));
    }
}
