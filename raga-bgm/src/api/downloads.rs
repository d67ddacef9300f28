//! Artifact downloads for registered runs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::models::PipelineReport;
use crate::{ApiError, ApiResult, AppState};

/// GET /runs/:id/midi
pub async fn download_midi(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> ApiResult<Response> {
    let report = lookup_run(&state, run_id).await?;
    let bytes = tokio::fs::read(&report.artifacts.midi_path).await?;
    Ok(attachment("audio/midi", crate::DEFAULT_MIDI_FILE, bytes))
}

/// GET /runs/:id/wav
pub async fn download_wav(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> ApiResult<Response> {
    let report = lookup_run(&state, run_id).await?;
    let bytes = tokio::fs::read(&report.artifacts.wav_path).await?;
    Ok(attachment("audio/wav", crate::DEFAULT_WAV_FILE, bytes))
}

/// GET /runs/:id/audio
///
/// Same WAV as the download, served inline for the page's audio player.
pub async fn stream_audio(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> ApiResult<Response> {
    let report = lookup_run(&state, run_id).await?;
    let bytes = tokio::fs::read(&report.artifacts.wav_path).await?;
    Ok(([(header::CONTENT_TYPE, "audio/wav")], bytes).into_response())
}

async fn lookup_run(state: &AppState, run_id: Uuid) -> ApiResult<PipelineReport> {
    state
        .runs
        .read()
        .await
        .get(&run_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Run {} not found", run_id)))
}

fn attachment(content_type: &'static str, file_name: &str, bytes: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file_name);
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

/// Build download routes
pub fn download_routes() -> Router<AppState> {
    Router::new()
        .route("/runs/:id/midi", get(download_midi))
        .route("/runs/:id/wav", get(download_wav))
        .route("/runs/:id/audio", get(stream_audio))
}
