//! Error types for raga-bgm
//!
//! `BgmError` covers the pipeline stages. Every variant is fatal for the
//! run it occurs in; nothing is retried. `ApiError` is the HTTP face of
//! those failures for the web service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::gemini_client::GeminiError;

/// Pipeline error type
#[derive(Debug, Error)]
pub enum BgmError {
    /// Input audio could not be opened, probed or decoded
    #[error("Audio load failed: {0}")]
    AudioLoad(String),

    /// Feature extraction failed (e.g. resampler construction)
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// Remote text-generation call failed
    #[error("Suggestion request failed: {0}")]
    Suggestion(#[from] GeminiError),

    /// MIDI serialization failed
    #[error("MIDI export failed: {0}")]
    Midi(String),

    /// Audio rendering or WAV writing failed
    #[error("Audio render failed: {0}")]
    Render(String),

    /// Pitch plot rendering failed
    #[error("Plot failed: {0}")]
    Plot(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// raga-common error
    #[error("Common error: {0}")]
    Common(#[from] raga_common::Error),
}

/// Result type for pipeline operations
pub type BgmResult<T> = Result<T, BgmError>;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upstream text-generation service failed (502)
    #[error("Upstream service error: {0}")]
    BadGateway(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BgmError> for ApiError {
    fn from(err: BgmError) -> Self {
        match err {
            BgmError::AudioLoad(_) => ApiError::BadRequest(err.to_string()),
            BgmError::Suggestion(_) => ApiError::BadGateway(err.to_string()),
            BgmError::Io(e) => ApiError::Io(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ApiError {
    /// HTTP status, machine-readable code and message
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone()),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
            ApiError::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                err.to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
