//! LLM Client: the single point of entry for chat-completion calls in ResuBot.
//!
//! No other module talks to the advisory service directly. The network seam is
//! the `ChatTransport` trait; everything above it (credential check, request
//! body, response interpretation) lives here so it can run against a mock.
//!
//! One call, one failure path: there is no retry and no streaming.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod transport;

pub use transport::{ChatTransport, RawResponse, ReqwestTransport};

pub const DEFAULT_API_BASE: &str = "https://api.deepseek.com/v1";
/// The model used for every advisory call.
pub const MODEL: &str = "deepseek-chat";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2000;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("advisory API key is not configured")]
    Configuration,

    #[error("advisory API rejected the credential: {0}")]
    Auth(String),

    #[error("advisory endpoint unreachable: {0}")]
    Connectivity(String),

    #[error(
        "advisory API protocol error (status {status}): {}",
        .detail.as_deref().unwrap_or("malformed response")
    )]
    Protocol { status: u16, detail: Option<String> },

    #[error("{0}")]
    Unknown(String),
}

impl AdvisoryError {
    /// The displayable string shown in place of a reply.
    pub fn user_message(&self) -> String {
        match self {
            AdvisoryError::Configuration => "Error: API key not configured. \
                Please set DEEPSEEK_API_KEY in your environment or .env file."
                .to_string(),
            AdvisoryError::Auth(_) => {
                "Error: Invalid or expired API key. Please check your API key configuration."
                    .to_string()
            }
            AdvisoryError::Connectivity(_) => {
                "Error: Unable to connect to the API. Please check your internet connection."
                    .to_string()
            }
            AdvisoryError::Protocol {
                detail: Some(detail),
                ..
            } => format!("Error: The advisory service returned an error: {detail}"),
            AdvisoryError::Protocol { detail: None, .. } => {
                "Error: Unable to get response from the chatbot.".to_string()
            }
            AdvisoryError::Unknown(detail) => {
                format!("Error: Unable to get response from the chatbot. {detail}")
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the ordered message list sent to the advisory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub role: Role,
    pub content: String,
}

impl OutboundMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Per-call model parameters. `None` leaves the service default in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout: Option<Duration>,
}

impl CompletionParams {
    /// Fixed parameters for the conversational advisor.
    pub const ADVISORY: CompletionParams = CompletionParams {
        temperature: Some(TEMPERATURE),
        max_tokens: Some(MAX_TOKENS),
        timeout: None,
    };
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [OutboundMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Stateless chat-completion client. The credential is handed in at
/// construction; a missing one is reported per call, never at startup.
#[derive(Clone)]
pub struct LlmClient {
    api_key: Option<String>,
    endpoint: String,
    transport: Arc<dyn ChatTransport>,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, api_base: &str, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            transport,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends `messages` with the fixed advisory parameters.
    pub async fn complete(&self, messages: &[OutboundMessage]) -> Result<String, AdvisoryError> {
        self.complete_with(messages, CompletionParams::ADVISORY).await
    }

    pub async fn complete_with(
        &self,
        messages: &[OutboundMessage],
        params: CompletionParams,
    ) -> Result<String, AdvisoryError> {
        let api_key = self.api_key.as_deref().ok_or(AdvisoryError::Configuration)?;

        let request = ChatCompletionRequest {
            model: MODEL,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| AdvisoryError::Unknown(format!("failed to encode request: {e}")))?;

        debug!("Sending {} messages to {}", messages.len(), self.endpoint);
        let raw = self
            .transport
            .post_json(&self.endpoint, api_key.trim(), &body, params.timeout)
            .await?;

        interpret_response(raw)
    }
}

/// Maps a raw HTTP exchange onto a reply or a typed failure.
fn interpret_response(raw: RawResponse) -> Result<String, AdvisoryError> {
    let status = raw.status;

    if status == 401 || status == 403 {
        warn!("Advisory API rejected credential: status {status}");
        return Err(AdvisoryError::Auth(
            embedded_error(&raw.body).unwrap_or(raw.body),
        ));
    }

    if !(200..300).contains(&status) {
        warn!("Advisory API returned {status}: {}", raw.body);
        return Err(AdvisoryError::Protocol {
            status,
            detail: embedded_error(&raw.body),
        });
    }

    let parsed: ChatCompletionResponse =
        serde_json::from_str(&raw.body).map_err(|_| AdvisoryError::Protocol {
            status,
            detail: None,
        })?;

    if let Some(error) = parsed.error {
        return Err(AdvisoryError::Protocol {
            status,
            detail: Some(error_detail(&error)),
        });
    }

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(AdvisoryError::Protocol {
            status,
            detail: None,
        })
}

fn embedded_error(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error").map(error_detail)
}

fn error_detail(error: &serde_json::Value) -> String {
    match error {
        serde_json::Value::String(s) => s.clone(),
        other => other
            .get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .unwrap_or_else(|| other.to_string()),
    }
}
