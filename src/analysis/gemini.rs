//! Gemini implementation of `LanguageModel`.
//!
//! One synchronous `models/{model}:generateContent` call per prompt.
//! The request timeout from config is set on the HTTP client, so a
//! hung service surfaces as `AnalysisError::Service` like any other
//! transport failure.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::analysis::LanguageModel;
use crate::config::ModelConfig;
use crate::error::AnalysisError;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    fn into_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let parts = candidate.content?.parts;
        if parts.is_empty() {
            return None;
        }
        Some(parts.into_iter().map(|p| p.text).collect())
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// Gemini-backed language model.
pub struct GeminiModel {
    http: reqwest::Client,
    api_key: SecretString,
    model: String,
}

impl GeminiModel {
    pub fn new(config: &ModelConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AnalysisError::Service {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        tracing::info!(model = %config.model, "Using Gemini");

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        let url = format!("{BASE_URL}/models/{}:generateContent", self.model);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("request timed out: {e}")
                } else {
                    format!("request failed: {e}")
                };
                AnalysisError::Service { reason }
            })?;

        let status = response.status();
        if !status.is_success() {
            // Quota exhaustion (429) and server errors land here too.
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Service {
                reason: format!("status {status}: {body}"),
            });
        }

        let reply: GenerateResponse = response.json().await.map_err(|e| AnalysisError::Service {
            reason: format!("unexpected payload: {e}"),
        })?;

        reply.into_text().ok_or_else(|| AnalysisError::Service {
            reason: "response contained no candidate text".to_string(),
        })
    }
}
