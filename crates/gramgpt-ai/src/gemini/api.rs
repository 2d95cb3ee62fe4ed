//! ModelClient trait implementation for GeminiClient (one-shot, structured
//! and streaming).

use async_trait::async_trait;
use futures_util::StreamExt;
use tracing::debug;

use crate::streaming::sse_events;
use crate::{AiError, ChatRequest, DeltaStream, ModelClient, OutputShape};

use super::client::{build_request_body, classify_failure, extract_text, parse_response, GeminiClient};

impl GeminiClient {
    /// POST `body` and return the response once its status is known good.
    async fn post(&self, stream: bool, body: &serde_json::Value) -> Result<reqwest::Response, AiError> {
        let url = self.api_url(stream);

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &text));
        }
        Ok(response)
    }

    async fn complete(
        &self,
        request: &ChatRequest,
        shape: Option<OutputShape>,
    ) -> Result<String, AiError> {
        let body = build_request_body(request, shape);
        let response = self.post(false, &body).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        parse_response(&json)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn complete_once(&self, request: &ChatRequest) -> Result<String, AiError> {
        debug!(model = %self.config.model, turns = request.contents.len(), "Gemini API request");
        self.complete(request, None).await
    }

    async fn stream_turn(&self, request: &ChatRequest) -> Result<DeltaStream, AiError> {
        debug!(model = %self.config.model, turns = request.contents.len(), "Gemini API streaming request");

        let body = build_request_body(request, None);
        let response = self.post(true, &body).await?;

        let deltas = sse_events(response.bytes_stream()).filter_map(|event| async move {
            let event = match event {
                Ok(event) => event,
                Err(e) => return Some(Err(e)),
            };
            let chunk = match serde_json::from_str::<serde_json::Value>(&event.data) {
                Ok(chunk) => chunk,
                Err(e) => return Some(Err(AiError::MalformedResponse(e.to_string()))),
            };
            extract_text(&chunk).transpose()
        });

        Ok(Box::pin(deltas))
    }

    async fn complete_structured(
        &self,
        request: &ChatRequest,
        shape: OutputShape,
    ) -> Result<String, AiError> {
        debug!(model = %self.config.model, ?shape, "Gemini API structured request");
        self.complete(request, Some(shape)).await
    }
}
