//! Local stand-in for the Gemini `generateContent` endpoint

use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::json;
use std::time::Duration;

use raga_bgm::services::GeminiConfig;

/// Text returned by the succeeding stub
pub const STUB_SUGGESTION: &str = "Begin with a slow alap in the lower octave.";

/// Start a stub that answers every call with [`STUB_SUGGESTION`]
pub async fn spawn_ok() -> String {
    spawn(Router::new().route("/v1beta/models/:call", post(ok_handler))).await
}

/// Start a stub that answers every call with HTTP 500
pub async fn spawn_failing() -> String {
    spawn(Router::new().route("/v1beta/models/:call", post(failing_handler))).await
}

/// Client config pointing at a stub base URL
pub fn config_for(base_url: &str) -> GeminiConfig {
    GeminiConfig {
        api_key: "test-key".to_string(),
        model: "gemini-1.5-flash".to_string(),
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
    }
}

async fn ok_handler() -> impl IntoResponse {
    Json(json!({
        "candidates": [{
            "content": { "parts": [{ "text": STUB_SUGGESTION }], "role": "model" },
            "finishReason": "STOP"
        }]
    }))
}

async fn failing_handler() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": { "code": 500, "message": "internal" } })),
    )
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
