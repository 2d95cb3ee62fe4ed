//! Shared proxy state: the upstream endpoint and the key that never leaves
//! the server.

use std::path::PathBuf;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};

pub struct AppState {
    http: reqwest::Client,
    upstream_url: String,
    api_key: String,
    pub static_dir: PathBuf,
}

/// An upstream reply, passed back to the caller as-is.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl AppState {
    pub fn new(
        api_key: impl Into<String>,
        api_base: &str,
        model: &str,
        static_dir: impl Into<PathBuf>,
        request_timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to build tuned HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self {
            http,
            upstream_url: format!("{}/{model}:generateContent", api_base.trim_end_matches('/')),
            api_key: api_key.into(),
            static_dir: static_dir.into(),
        }
    }

    pub fn upstream_url(&self) -> &str {
        &self.upstream_url
    }

    /// POST `body` upstream with the server-held key.
    pub async fn forward(&self, body: &serde_json::Value) -> Result<UpstreamReply, reqwest::Error> {
        let response = self
            .http
            .post(&self.upstream_url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .cloned();
        let body = response.bytes().await?;

        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("upstream_url", &self.upstream_url)
            .field("api_key", &"[REDACTED]")
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_url_joins_base_and_model() {
        let state = AppState::new(
            "k",
            "https://example.test/v1beta/models/",
            "gemini-2.5-flash",
            "public",
            Duration::from_secs(5),
        );
        assert_eq!(
            state.upstream_url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn debug_redacts_key() {
        let state = AppState::new("top-secret", "http://x", "m", "public", Duration::from_secs(5));
        assert!(!format!("{state:?}").contains("top-secret"));
    }
}
