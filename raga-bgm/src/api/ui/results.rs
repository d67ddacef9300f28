//! Results page shown after a successful run

use axum::response::Html;
use uuid::Uuid;

use super::{escape_html, page};
use crate::models::PipelineReport;

/// Render the results of run `run_id`
///
/// `plot_svg` is embedded inline when present.
pub fn results_page(run_id: Uuid, report: &PipelineReport, plot_svg: Option<&str>) -> Html<String> {
    let plot = plot_svg
        .map(|svg| format!(r#"        <h2>Pitch contour</h2>
        <div class="plot">{}</div>"#, svg))
        .unwrap_or_default();

    let content = format!(
        r#"        <h2>Audio features</h2>
        <table class="stats">
            <tr><td>Raga</td><td>{raga}</td></tr>
            <tr><td>Mood</td><td>{mood}</td></tr>
            <tr><td>Tempo</td><td>{tempo:.2} BPM</td></tr>
            <tr><td>Average pitch</td><td>{pitch:.2} Hz</td></tr>
            <tr><td>Notes</td><td>{notes}</td></tr>
        </table>

        <h2>AI composition suggestion</h2>
        <div class="suggestion">{suggestion}</div>

        <h2>Generated music</h2>
        <audio controls src="/runs/{run_id}/audio"></audio>
        <p>
            <a class="button" href="/runs/{run_id}/midi">Download MIDI</a>
            <a class="button" href="/runs/{run_id}/wav">Download WAV</a>
            <a class="button" href="/">Compose another</a>
        </p>
{plot}"#,
        raga = escape_html(&report.request.raga),
        mood = escape_html(&report.request.mood),
        tempo = report.features.tempo_bpm,
        pitch = report.features.average_pitch_hz,
        notes = report.notes.len(),
        suggestion = escape_html(&report.suggestion),
    );

    Html(page("Results", &content))
}
