//! Integration tests for the full scan pipeline.
//!
//! Each test wires the scanner to in-memory stub collaborators (no real
//! mailbox, no real model) and exercises the whole
//! extract → normalize → analyze → report → mark-read flow.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use inbox_digest::analysis::{AnalysisResult, Analyzer, LanguageModel};
use inbox_digest::error::{AnalysisError, MailboxError};
use inbox_digest::extract::extract_body;
use inbox_digest::mailbox::{Header, MailboxProvider, MessagePart, PartBody, RawMessage};
use inbox_digest::normalize::normalize;
use inbox_digest::scanner::MailboxScanner;

// ── Fixtures ────────────────────────────────────────────────────────

/// URL-safe base64 of:
/// "Hi team,\n\n> old reply\nPlease send the report by Friday.\n-- \nJane"
const TEAM_BODY_B64: &str =
    "SGkgdGVhbSwKCj4gb2xkIHJlcGx5ClBsZWFzZSBzZW5kIHRoZSByZXBvcnQgYnkgRnJpZGF5LgotLSAKSmFuZQ";

/// URL-safe base64 of "<b>ignore me, I'm the HTML part</b>"
const HTML_PART_B64: &str = "PGI-aWdub3JlIG1lLCBJJ20gdGhlIEhUTUwgcGFydDwvYj4";

const TEAM_REPLY_JSON: &str = r#"{"summary":"Jane asks for the report by Friday.","action_items":["Send the report"],"key_dates":["Friday"],"sentiment":"Neutral"}"#;

fn team_message(id: &str) -> RawMessage {
    RawMessage {
        id: id.to_string(),
        payload: Some(MessagePart {
            mime_type: "multipart/alternative".to_string(),
            headers: vec![Header {
                name: "From".to_string(),
                value: "Jane <jane@example.com>".to_string(),
            }],
            parts: vec![
                MessagePart {
                    mime_type: "text/plain".to_string(),
                    body: Some(PartBody {
                        data: Some(TEAM_BODY_B64.to_string()),
                    }),
                    ..Default::default()
                },
                MessagePart {
                    mime_type: "text/html".to_string(),
                    body: Some(PartBody {
                        data: Some(HTML_PART_B64.to_string()),
                    }),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }),
    }
}

fn expected_team_analysis() -> AnalysisResult {
    AnalysisResult {
        summary: "Jane asks for the report by Friday.".to_string(),
        action_items: vec!["Send the report".to_string()],
        key_dates: vec!["Friday".to_string()],
        sentiment: "Neutral".to_string(),
    }
}

// ── Stub collaborators ──────────────────────────────────────────────

/// Mailbox stub that records mark-read calls.
struct StubMailbox {
    messages: Vec<RawMessage>,
    marked: Mutex<Vec<String>>,
}

impl StubMailbox {
    fn new(messages: Vec<RawMessage>) -> Self {
        Self {
            messages,
            marked: Mutex::new(Vec::new()),
        }
    }

    fn marked(&self) -> Vec<String> {
        self.marked.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailboxProvider for StubMailbox {
    async fn list_unread(&self) -> Result<Vec<String>, MailboxError> {
        Ok(self.messages.iter().map(|m| m.id.clone()).collect())
    }

    async fn get(&self, id: &str) -> Result<RawMessage, MailboxError> {
        self.messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(MailboxError::Api {
                operation: "get",
                status: 404,
                message: "not found".to_string(),
            })
    }

    async fn mark_read(&self, id: &str) -> Result<(), MailboxError> {
        self.marked.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

/// Model stub that returns a fixed reply and records the prompts it saw.
struct EchoModel {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl EchoModel {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for EchoModel {
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn pipeline_yields_the_stubbed_analysis_exactly() {
    // Drive the content pipeline directly: extract → normalize → analyze.
    let message = team_message("m1");
    let body = extract_body(&message).unwrap();
    assert_eq!(
        body,
        "Hi team,\n\n> old reply\nPlease send the report by Friday.\n-- \nJane"
    );

    let cleaned = normalize(&body);
    assert_eq!(cleaned, "Hi team,\n\nPlease send the report by Friday.");

    let model = Arc::new(EchoModel::new(TEAM_REPLY_JSON));
    let analyzer = Analyzer::new(Arc::clone(&model) as Arc<dyn LanguageModel>);
    let analysis = analyzer.analyze(&cleaned).await.unwrap();

    assert_eq!(analysis, expected_team_analysis());

    // The prompt embeds the normalized body, not the raw one.
    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Hi team,\n\nPlease send the report by Friday."));
    assert!(!prompts[0].contains("> old reply"));
}

#[tokio::test]
async fn fenced_model_reply_parses_the_same() {
    let model = Arc::new(EchoModel::new(&format!("```json\n{TEAM_REPLY_JSON}\n```")));
    let analyzer = Analyzer::new(model as Arc<dyn LanguageModel>);

    let analysis = analyzer.analyze("anything").await.unwrap();
    assert_eq!(analysis, expected_team_analysis());
}

#[tokio::test]
async fn scan_reports_and_marks_each_message_read() {
    let mailbox = Arc::new(StubMailbox::new(vec![
        team_message("m1"),
        team_message("m2"),
    ]));
    let model = Arc::new(EchoModel::new(TEAM_REPLY_JSON));
    let scanner = MailboxScanner::new(
        Arc::clone(&mailbox) as Arc<dyn MailboxProvider>,
        Analyzer::new(model as Arc<dyn LanguageModel>),
    );

    let summary = scanner.scan().await.unwrap();

    assert_eq!(summary.listed, 2);
    assert_eq!(summary.analyzed, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(mailbox.marked(), vec!["m1", "m2"]);
}

#[tokio::test]
async fn garbage_model_reply_leaves_messages_unread() {
    let mailbox = Arc::new(StubMailbox::new(vec![team_message("m1")]));
    let model = Arc::new(EchoModel::new("Sorry, I had trouble with that."));
    let scanner = MailboxScanner::new(
        Arc::clone(&mailbox) as Arc<dyn MailboxProvider>,
        Analyzer::new(model as Arc<dyn LanguageModel>),
    );

    let summary = scanner.scan().await.unwrap();

    assert_eq!(summary.analyzed, 0);
    assert_eq!(summary.failed, 1);
    assert!(mailbox.marked().is_empty());
}

#[tokio::test]
async fn partial_model_reply_still_analyzes_with_defaults() {
    let mailbox = Arc::new(StubMailbox::new(vec![team_message("m1")]));
    // No action_items/key_dates/sentiment — must not error.
    let model = Arc::new(EchoModel::new(r#"{"summary": "A note from Jane."}"#));
    let scanner = MailboxScanner::new(
        Arc::clone(&mailbox) as Arc<dyn MailboxProvider>,
        Analyzer::new(model as Arc<dyn LanguageModel>),
    );

    let summary = scanner.scan().await.unwrap();

    assert_eq!(summary.analyzed, 1);
    assert_eq!(mailbox.marked(), vec!["m1"]);
}
