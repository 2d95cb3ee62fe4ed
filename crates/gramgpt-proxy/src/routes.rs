//! HTTP route handlers for the GramGPT proxy.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use gramgpt_common::new_correlation_id;
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::state::AppState;

pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

/// Create the router: the model passthrough, health, and static files for
/// every other path.
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    Router::new()
        .route("/health", get(health_check))
        .route("/api/gemini", post(forward_gemini))
        .fallback_service(static_files)
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "gramgpt-proxy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Forward a model request body upstream; the reply's status and body come
/// back unchanged.
async fn forward_gemini(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let request_id = new_correlation_id();

    match state.forward(&body).await {
        Ok(reply) => {
            info!(%request_id, status = reply.status.as_u16(), "forwarded model request");
            let mut response = (reply.status, reply.body).into_response();
            if let Some(content_type) = reply.content_type {
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, content_type);
            }
            response
        }
        Err(e) => {
            error!(%request_id, error = %e, "upstream request failed");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": { "message": INTERNAL_ERROR_MESSAGE } })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{HeaderMap, Request};
    use tower::ServiceExt;

    use super::*;

    /// Start a fake model API and return its base URL.
    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/models")
    }

    fn app(api_base: &str, static_dir: &std::path::Path) -> Router {
        create_router(Arc::new(AppState::new(
            "server-key",
            api_base,
            "gemini-2.5-flash",
            static_dir,
            Duration::from_secs(5),
        )))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/gemini")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let dir = tempfile::tempdir().unwrap();
        let response = app("http://127.0.0.1:1", dir.path())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "gramgpt-proxy");
    }

    #[tokio::test]
    async fn forwards_body_with_server_key() {
        let upstream = Router::new().route(
            "/models/{method}",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                Json(serde_json::json!({
                    "key": headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()),
                    "echo": body,
                }))
            }),
        );
        let base = spawn_upstream(upstream).await;
        let dir = tempfile::tempdir().unwrap();

        let response = app(&base, dir.path())
            .oneshot(post_json(r#"{"contents":[{"role":"user","parts":[{"text":"hi"}]}]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["key"], "server-key");
        assert_eq!(json["echo"]["contents"][0]["parts"][0]["text"], "hi");
    }

    #[tokio::test]
    async fn upstream_status_and_body_pass_through() {
        let upstream_body = r#"{"error":{"code":429,"message":"Resource exhausted"}}"#;
        let upstream = Router::new().route(
            "/models/{method}",
            post(move || async move {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::CONTENT_TYPE, "application/json")],
                    upstream_body,
                )
            }),
        );
        let base = spawn_upstream(upstream).await;
        let dir = tempfile::tempdir().unwrap();

        let response = app(&base, dir.path())
            .oneshot(post_json(r#"{"contents":[]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_string(response).await, upstream_body);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let response = app("http://127.0.0.1:1/models", dir.path())
            .oneshot(post_json(r#"{"contents":[]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["error"]["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn invalid_json_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let response = app("http://127.0.0.1:1/models", dir.path())
            .oneshot(post_json("{not json"))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn other_paths_serve_static_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>GramGPT</h1>").unwrap();

        let response = app("http://127.0.0.1:1/models", dir.path())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "<h1>GramGPT</h1>");
    }
}
