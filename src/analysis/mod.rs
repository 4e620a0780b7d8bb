//! Structured email analysis via a language model.
//!
//! The `Analyzer` builds the prompt, makes one request through the
//! `LanguageModel` seam, and parses the reply at a tagged boundary:
//! success with an `AnalysisResult`, or failure that retains the raw
//! response text. Well-formedness is never assumed.

pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

// ── Language model seam ─────────────────────────────────────────────

/// Minimal language-model interface: one prompt in, free-form text out.
/// One call, one reply — no streaming, no retries.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError>;
}

// ── Analysis result ─────────────────────────────────────────────────

/// Structured analysis of one email.
///
/// Every field defaults when the model omits it — partial JSON parses
/// to empty values rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Prose summary of the core message.
    #[serde(default)]
    pub summary: String,
    /// Tasks or actions required from the recipient.
    #[serde(default)]
    pub action_items: Vec<String>,
    /// Dates, deadlines, or event times mentioned.
    #[serde(default)]
    pub key_dates: Vec<String>,
    /// Short sentiment label (e.g. Positive, Neutral, Negative, Urgent).
    #[serde(default)]
    pub sentiment: String,
}

// ── Analyzer ────────────────────────────────────────────────────────

/// Builds prompts and turns model replies into `AnalysisResult`s.
pub struct Analyzer {
    model: Arc<dyn LanguageModel>,
}

impl Analyzer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Analyze a normalized email body.
    pub async fn analyze(&self, body: &str) -> Result<AnalysisResult, AnalysisError> {
        let prompt = build_prompt(body);
        let response = self.model.generate(&prompt).await?;
        parse_analysis(&response)
    }
}

/// Build the all-in-one analysis prompt.
///
/// The cleaning instructions overlap with what the normalizer already
/// did — deliberate defense in depth, since HTML-derived bodies can
/// still carry quoting and boilerplate the line-based pass misses.
fn build_prompt(body: &str) -> String {
    format!(
        "Analyze the following raw email content. Your task is to act as an intelligent \
         email assistant.\n\
         First, mentally clean the content by ignoring quoted replies from previous emails, \
         boilerplate text like unsubscribe links, and email signatures.\n\
         Then, based only on the core message, provide a structured analysis in a valid \
         JSON format.\n\n\
         The summary should be a clear, easy-to-read paragraph.\n\n\
         Raw Email Content:\n\
         ---\n\
         {body}\n\
         ---\n\n\
         Provide your response as a single JSON object with the following schema:\n\
         {{\n\
           \"summary\": \"A clear, paragraph-style summary of the email's core message, \
         suitable for a quick read.\",\n\
           \"action_items\": [\"A list of specific tasks or actions required from the \
         recipient.\"],\n\
           \"key_dates\": [\"A list of any important dates, deadlines, or event times \
         mentioned.\"],\n\
           \"sentiment\": \"The sentiment of the core message (e.g., 'Positive', \
         'Neutral', 'Negative', 'Urgent').\"\n\
         }}"
    )
}

/// Parse a model reply, tolerating markdown fences around the JSON.
fn parse_analysis(response: &str) -> Result<AnalysisResult, AnalysisError> {
    let json = extract_json_object(response);
    serde_json::from_str(json).map_err(|e| AnalysisError::MalformedResponse {
        reason: e.to_string(),
        raw: response.to_string(),
    })
}

/// Extract a JSON object from model output that may be fenced or
/// surrounded by prose.
fn extract_json_object(text: &str) -> &str {
    let trimmed = text.trim();

    // Already bare JSON
    if trimmed.starts_with('{') {
        return trimmed;
    }

    // ```json fenced block
    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }

    // Anonymous fenced block
    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('{') {
                return inner;
            }
        }
    }

    // Outermost object bounds
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && end > start
    {
        return &trimmed[start..=end];
    }

    // Give up — let the parser report what it saw.
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_result_json() -> &'static str {
        r#"{
            "summary": "Jane asks for the report by Friday.",
            "action_items": ["Send the report"],
            "key_dates": ["Friday"],
            "sentiment": "Neutral"
        }"#
    }

    fn expected_result() -> AnalysisResult {
        AnalysisResult {
            summary: "Jane asks for the report by Friday.".to_string(),
            action_items: vec!["Send the report".to_string()],
            key_dates: vec!["Friday".to_string()],
            sentiment: "Neutral".to_string(),
        }
    }

    #[test]
    fn parses_bare_json() {
        assert_eq!(parse_analysis(full_result_json()).unwrap(), expected_result());
    }

    #[test]
    fn parses_fenced_json() {
        let response = format!("```json\n{}\n```", full_result_json());
        assert_eq!(parse_analysis(&response).unwrap(), expected_result());
    }

    #[test]
    fn parses_anonymous_fence() {
        let response = format!("```\n{}\n```", full_result_json());
        assert_eq!(parse_analysis(&response).unwrap(), expected_result());
    }

    #[test]
    fn parses_json_with_surrounding_prose() {
        let response = format!("Here is the analysis:\n{}\nHope that helps!", full_result_json());
        assert_eq!(parse_analysis(&response).unwrap(), expected_result());
    }

    #[test]
    fn missing_fields_parse_to_defaults() {
        let result = parse_analysis(r#"{"summary": "Short note."}"#).unwrap();
        assert_eq!(result.summary, "Short note.");
        assert!(result.action_items.is_empty());
        assert!(result.key_dates.is_empty());
        assert_eq!(result.sentiment, "");
    }

    #[test]
    fn non_json_fails_with_raw_text_retained() {
        let response = "I could not analyze this email, sorry.";
        match parse_analysis(response) {
            Err(AnalysisError::MalformedResponse { raw, .. }) => assert_eq!(raw, response),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn unclosed_fence_fails_with_raw_text_retained() {
        let response = "```json\n{\"summary\": \"half";
        assert!(matches!(
            parse_analysis(response),
            Err(AnalysisError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn prompt_embeds_the_body_and_schema() {
        let prompt = build_prompt("Please send the report by Friday.");
        assert!(prompt.contains("Please send the report by Friday."));
        assert!(prompt.contains("\"summary\""));
        assert!(prompt.contains("\"action_items\""));
        assert!(prompt.contains("\"key_dates\""));
        assert!(prompt.contains("\"sentiment\""));
        assert!(prompt.contains("unsubscribe"));
        assert!(prompt.contains("quoted replies"));
    }
}
