//! Chat-completion translation adapter.
//!
//! [`Translator`] sends one chunk of text per request to an OpenAI-compatible
//! `POST {api_base}/chat/completions` endpoint and hands back the model's
//! output verbatim. Each call is single-shot: retry policy belongs to the
//! caller, which uses [`TranslateError::is_retryable`] to classify failures:
//!
//! - HTTP 429 (rate limited) and 5xx (server error) → retryable
//! - Network errors → retryable
//! - HTTP 4xx (client error, not 429) → not retryable
//! - Malformed response bodies → not retryable

use std::fmt;
use std::time::Duration;

use crate::config::TranslationConfig;

/// Fixed system prompt framing every translation request.
const SYSTEM_PROMPT: &str = "You are a professional translator. Translate the following text \
     accurately while preserving the original formatting, style, and meaning. Maintain \
     paragraph breaks and sentence structure.";

/// Failure modes of a single translation request.
#[derive(Debug)]
pub enum TranslateError {
    /// `OPENAI_API_KEY` is not in the environment.
    MissingApiKey,
    /// The request never produced an HTTP response (DNS, TLS, timeout).
    Network(String),
    /// The API answered with a non-success status.
    Api { status: u16, detail: String },
    /// The API answered 200 but the body was not the expected shape.
    MalformedResponse(String),
}

impl TranslateError {
    /// Whether a fresh attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslateError::Network(_) => true,
            TranslateError::Api { status, .. } => *status == 429 || *status >= 500,
            TranslateError::MissingApiKey | TranslateError::MalformedResponse(_) => false,
        }
    }
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::MissingApiKey => {
                write!(f, "OPENAI_API_KEY environment variable not set")
            }
            TranslateError::Network(e) => write!(f, "network error calling translation API: {}", e),
            TranslateError::Api { status, detail } => {
                write!(f, "translation API error {}: {}", status, detail)
            }
            TranslateError::MalformedResponse(e) => {
                write!(f, "invalid translation API response: {}", e)
            }
        }
    }
}

impl std::error::Error for TranslateError {}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct Translator {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f64,
}

impl Translator {
    /// Build a translator from configuration.
    ///
    /// # Errors
    ///
    /// Fails if `OPENAI_API_KEY` is not set or the HTTP client cannot be
    /// constructed.
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslateError> {
        let api_key =
            std::env::var("OPENAI_API_KEY").map_err(|_| TranslateError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranslateError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Translate one piece of text with a single API request.
    ///
    /// The text comes back exactly as the model produced it; callers own any
    /// trimming or paragraph restitching.
    pub async fn translate(
        &self,
        text: &str,
        target_language: Option<&str>,
        source_language: Option<&str>,
        hints: Option<&str>,
    ) -> Result<String, TranslateError> {
        let body = serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                {"role": "system", "content": build_system_prompt(hints)},
                {"role": "user", "content": build_user_prompt(text, target_language, source_language)},
            ],
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslateError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(TranslateError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| TranslateError::MalformedResponse(e.to_string()))?;
        parse_chat_response(&json)
    }
}

/// System prompt plus any caller-supplied instructions. Blank hints are
/// ignored.
fn build_system_prompt(hints: Option<&str>) -> String {
    match hints {
        Some(h) if !h.trim().is_empty() => {
            format!("{}\n\nAdditional translation instructions: {}", SYSTEM_PROMPT, h)
        }
        _ => SYSTEM_PROMPT.to_string(),
    }
}

/// User message for the four combinations of source and target language.
/// With neither given, the text passes through with no directive at all.
fn build_user_prompt(text: &str, target: Option<&str>, source: Option<&str>) -> String {
    match (source, target) {
        (Some(source), Some(target)) => {
            format!("Translate the following text from {} to {}:\n\n{}", source, target, text)
        }
        (None, Some(target)) => {
            format!("Translate the following text to {}:\n\n{}", target, text)
        }
        (Some(source), None) => {
            format!("The following text is in {}. Translate it:\n\n{}", source, text)
        }
        (None, None) => text.to_string(),
    }
}

/// Pull `choices[0].message.content` out of a chat-completions response.
fn parse_chat_response(json: &serde_json::Value) -> Result<String, TranslateError> {
    let first = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .ok_or_else(|| {
            TranslateError::MalformedResponse("missing choices array".to_string())
        })?;

    first
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            TranslateError::MalformedResponse("missing message content".to_string())
        })
}
