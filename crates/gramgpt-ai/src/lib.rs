//! Conversation engine for GramGPT.
//!
//! Provides:
//! - the `ModelClient` seam and a Gemini REST implementation (JSON + SSE)
//! - `ConversationSession`: history, streamed turn assembly, cancellation,
//!   regeneration, summaries and follow-up suggestions
//! - prompt text, seeds and topic catalogs
//! - optional speech capability seams

pub mod gemini;
pub mod prompts;
pub mod session;
pub mod speech;
pub mod streaming;
pub mod suggestions;
pub mod topics;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

pub use gemini::{GeminiClient, GeminiConfig};
pub use session::{
    CancelHandle, ConversationSession, SessionError, SessionOptions, SuggestionSet, Turn, TurnKind,
};

/// Incremental text deltas of one model answer. Finite; dropping it stops
/// local consumption.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, AiError>> + Send>>;

#[async_trait]
pub trait ModelClient: Send + Sync {
    /// One-shot completion returning the full text.
    async fn complete_once(&self, request: &ChatRequest) -> Result<String, AiError>;

    /// Streaming completion.
    async fn stream_turn(&self, request: &ChatRequest) -> Result<DeltaStream, AiError>;

    /// Completion constrained to `shape`. The raw text is returned; callers
    /// parse and validate it.
    async fn complete_structured(
        &self,
        request: &ChatRequest,
        shape: OutputShape,
    ) -> Result<String, AiError>;
}

/// Everything the model sees for one call. Rebuilt from the session
/// history every time, so no server-side conversation state is relied on.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub system_instruction: Option<String>,
    pub contents: Vec<Message>,
    pub params: GenerationParams,
}

impl ChatRequest {
    /// A single user prompt with no system instruction.
    pub fn prompt(text: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            system_instruction: None,
            contents: vec![Message::user(text)],
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// Sampling parameters for one request. `None` leaves the model default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f64,
    pub top_k: Option<u32>,
    pub top_p: Option<f64>,
    pub max_output_tokens: Option<u32>,
}

impl GenerationParams {
    pub fn with_temperature(temperature: f64) -> Self {
        Self {
            temperature,
            top_k: None,
            top_p: None,
            max_output_tokens: None,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: Some(40),
            top_p: Some(0.95),
            max_output_tokens: None,
        }
    }
}

/// Shape a structured-output request is constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    StringArray,
}

impl OutputShape {
    /// The response schema in the model API's JSON form.
    pub fn schema(&self) -> serde_json::Value {
        match self {
            OutputShape::StringArray => serde_json::json!({
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AiError {
    #[error("Invalid API credential")]
    InvalidCredential,
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Timeout")]
    Timeout,
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else if e.is_decode() {
            AiError::MalformedResponse(e.to_string())
        } else {
            AiError::NetworkError(e.to_string())
        }
    }
}
