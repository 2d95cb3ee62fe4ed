//! Gemini API client struct, request building, and response parsing.

use reqwest::StatusCode;
use tracing::warn;

use crate::{AiError, ChatRequest, OutputShape};

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to build tuned HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self { config, http }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub(crate) fn api_url(&self, stream: bool) -> String {
        let method = if stream {
            "streamGenerateContent?alt=sse"
        } else {
            "generateContent"
        };
        format!("{}/{}:{}", self.config.api_base, self.config.model, method)
    }
}

/// Build the JSON request body for the Gemini API.
pub(crate) fn build_request_body(
    request: &ChatRequest,
    shape: Option<OutputShape>,
) -> serde_json::Value {
    let contents: Vec<_> = request
        .contents
        .iter()
        .map(|msg| {
            serde_json::json!({
                "role": msg.role.as_str(),
                "parts": [{ "text": msg.content }]
            })
        })
        .collect();

    let params = &request.params;
    let mut generation_config = serde_json::json!({ "temperature": params.temperature });
    if let Some(top_k) = params.top_k {
        generation_config["topK"] = top_k.into();
    }
    if let Some(top_p) = params.top_p {
        generation_config["topP"] = top_p.into();
    }
    if let Some(max) = params.max_output_tokens {
        generation_config["maxOutputTokens"] = max.into();
    }
    if let Some(shape) = shape {
        generation_config["responseMimeType"] = "application/json".into();
        generation_config["responseSchema"] = shape.schema();
    }

    let mut body = serde_json::json!({
        "contents": contents,
        "generationConfig": generation_config,
    });

    if let Some(instruction) = &request.system_instruction {
        body["systemInstruction"] = serde_json::json!({
            "parts": [{ "text": instruction }]
        });
    }

    body
}

/// Concatenate the text parts of the first candidate.
///
/// Returns `Ok(None)` for a well-formed chunk that carries no text, which
/// happens on the final streamed chunk and on safety-blocked candidates.
pub(crate) fn extract_text(json: &serde_json::Value) -> Result<Option<String>, AiError> {
    if let Some(error) = json.get("error") {
        let message = error["message"].as_str().unwrap_or("unknown error");
        return Err(AiError::ApiError(message.to_string()));
    }

    let Some(first) = json["candidates"].as_array().and_then(|c| c.first()) else {
        return Ok(None);
    };

    let text: String = first["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default();

    Ok((!text.is_empty()).then_some(text))
}

/// Parse a complete (non-streaming) Gemini response into its text.
pub(crate) fn parse_response(json: &serde_json::Value) -> Result<String, AiError> {
    let has_candidates = json["candidates"]
        .as_array()
        .is_some_and(|candidates| !candidates.is_empty());
    if json.get("error").is_none() && !has_candidates {
        return Err(AiError::MalformedResponse(
            "no candidates in response".to_string(),
        ));
    }
    extract_text(json)?.ok_or_else(|| AiError::MalformedResponse("empty response text".into()))
}

/// Map a non-2xx status and its body to an error kind.
pub(crate) fn classify_failure(status: StatusCode, body: &str) -> AiError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => AiError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AiError::InvalidCredential,
        StatusCode::BAD_REQUEST
            if body.contains("API key not valid") || body.contains("API_KEY_INVALID") =>
        {
            AiError::InvalidCredential
        }
        _ => AiError::ApiError(format!("HTTP {status}: {}", truncate(body, 500))),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
