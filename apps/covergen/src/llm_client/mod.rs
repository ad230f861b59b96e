/// LLM Client — the single point of entry for all chat-completion calls in covergen.
///
/// `LlmClient` performs exactly ONE HTTP attempt per call. Retry policy lives in
/// `retry` and is applied by the caller, so fakes implementing `CompletionService`
/// go through the same backoff path as the real client.
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod retry;

/// Sampling temperature used for every letter generation.
pub const TEMPERATURE: f32 = 0.7;
/// Upper bound on the generated letter length, in tokens.
pub const MAX_TOKENS: u32 = 1000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// How the backoff loop should treat a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    RateLimited,
    Transient,
    /// Auth failures, malformed requests, unparseable bodies. Never retried.
    Unclassified,
}

impl LlmError {
    pub fn class(&self) -> ErrorClass {
        match self {
            LlmError::Api { status: 429, .. } => ErrorClass::RateLimited,
            LlmError::Api { status, .. } if *status == 408 || *status == 409 || *status >= 500 => {
                ErrorClass::Transient
            }
            // Any transport fault: refused, dropped, reset mid-body, timed out.
            LlmError::Http(e) if !e.is_builder() => ErrorClass::Transient,
            _ => ErrorClass::Unclassified,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.class() != ErrorClass::Unclassified
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire format
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if the service returned any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Service seam
// ────────────────────────────────────────────────────────────────────────────

/// A remote chat-completion backend. One call = one attempt.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;
}

/// Chat-completions client over HTTP with bearer authentication.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl LlmClient {
    pub fn new(api_key: String, api_base: &str) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            api_key,
            endpoint: format!("{api_base}/chat/completions"),
        })
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, body));
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        parsed
            .text()
            .filter(|t| !t.trim().is_empty())
            .map(str::to_owned)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Builds an `LlmError::Api`, preferring the service's own error message over the raw body.
fn api_error(status: StatusCode, body: String) -> LlmError {
    let message = serde_json::from_str::<OpenAiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api {
        status: status.as_u16(),
        message,
    }
}
