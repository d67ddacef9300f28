//! Compose endpoint: upload → pipeline → results page
//!
//! The upload lives in a temporary file that is removed when the request
//! finishes, whatever the outcome. Artifacts go to `output_dir/<run-id>/`
//! so concurrent requests never share output paths. A run is registered
//! for download only after the whole pipeline succeeded.
//!
//! Failures are rendered as an HTML error page unless the client asks for
//! JSON with `Accept: application/json`.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
    routing::post,
    Router,
};
use std::path::Path;
use std::str::FromStr;
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::api::ui::error::error_page;
use crate::api::ui::results::results_page;
use crate::models::{Artifacts, CompositionRequest, Mood, DEFAULT_RAGA};
use crate::runs::run_dir;
use crate::{ApiError, ApiResult, AppState};

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Parsed multipart form
struct ComposeForm {
    upload: NamedTempFile,
    request: CompositionRequest,
}

/// POST /compose
///
/// Multipart fields: `audio` (file), `raga` (text), `mood` (one of the
/// form's moods).
pub async fn compose(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    match run_compose(&state, multipart).await {
        Ok(page) => page.into_response(),
        Err(err) if wants_json(&headers) => err.into_response(),
        Err(err) => {
            let (status, _, message) = err.parts();
            (status, error_page(status, &message)).into_response()
        }
    }
}

/// True when the `Accept` header names `application/json`
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|media| {
            media
                .split(';')
                .next()
                .map(|m| m.trim().eq_ignore_ascii_case("application/json"))
                .unwrap_or(false)
        })
}

async fn run_compose(state: &AppState, multipart: Multipart) -> ApiResult<Html<String>> {
    let form = read_form(multipart).await?;

    let run_id = Uuid::new_v4();
    let run_dir = run_dir(&state.output_dir, run_id);
    tokio::fs::create_dir_all(&run_dir).await?;
    let artifacts = Artifacts::in_dir(&run_dir, true);

    tracing::info!(
        run_id = %run_id,
        raga = %form.request.raga,
        mood = %form.request.mood,
        "Compose request received"
    );

    let report = match state
        .pipeline
        .run(form.upload.path(), &form.request, &artifacts)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(run_id = %run_id, error = %e, "Compose run failed");
            state.set_last_error(e.to_string()).await;
            if let Err(cleanup) = tokio::fs::remove_dir_all(&run_dir).await {
                tracing::warn!(run_id = %run_id, error = %cleanup, "Failed to remove run directory");
            }
            return Err(e.into());
        }
    };

    let plot_svg = match &artifacts.plot_path {
        Some(path) => tokio::fs::read_to_string(path).await.ok(),
        None => None,
    };

    state.register_run(run_id, report.clone()).await;
    tracing::info!(run_id = %run_id, notes = report.notes.len(), "Run registered");

    Ok(results_page(run_id, &report, plot_svg.as_deref()))
}

async fn read_form(mut multipart: Multipart) -> ApiResult<ComposeForm> {
    let mut upload = None;
    let mut raga = None;
    let mut mood = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                let suffix = field
                    .file_name()
                    .and_then(|f| Path::new(f).extension())
                    .and_then(|e| e.to_str())
                    .map(|e| format!(".{}", e))
                    .unwrap_or_else(|| ".wav".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
                if bytes.is_empty() {
                    return Err(ApiError::BadRequest("Uploaded audio file is empty".to_string()));
                }

                let temp = tempfile::Builder::new()
                    .prefix("raga-bgm-upload-")
                    .suffix(&suffix)
                    .tempfile()?;
                tokio::fs::write(temp.path(), &bytes).await?;
                upload = Some(temp);
            }
            "raga" | "mood" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read {}: {}", name, e)))?;
                if name == "raga" {
                    raga = Some(value);
                } else {
                    mood = Some(value);
                }
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
            }
        }
    }

    let upload = upload.ok_or_else(|| ApiError::BadRequest("No audio file uploaded".to_string()))?;

    let raga = raga
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_RAGA.to_string());

    let mood = match mood {
        Some(value) => Mood::from_str(value.trim()).map_err(ApiError::BadRequest)?,
        None => Mood::ALL[0],
    };

    Ok(ComposeForm {
        upload,
        request: CompositionRequest::new(raga, mood.as_str()),
    })
}

/// Build compose routes
pub fn compose_routes() -> Router<AppState> {
    Router::new()
        .route("/compose", post(compose))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
