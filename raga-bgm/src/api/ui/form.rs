//! Upload form page

use axum::response::Html;

use super::{escape_html, page};
use crate::models::{Mood, DEFAULT_RAGA};

/// GET /
///
/// Audio upload, raga text field and mood select; posts to `/compose`.
pub async fn form_page() -> Html<String> {
    let mood_options: String = Mood::ALL
        .iter()
        .map(|mood| format!(r#"                <option value="{0}">{0}</option>"#, mood.as_str()))
        .collect::<Vec<_>>()
        .join("\n");

    let content = format!(
        r#"        <h2>Compose background music</h2>
        <p>Upload a recording. Its tempo and pitch contour are analysed and turned into a melody.</p>
        <form action="/compose" method="post" enctype="multipart/form-data">
            <label for="audio">Audio file (WAV)</label>
            <input type="file" id="audio" name="audio" accept="audio/*" required>

            <label for="raga">Raga</label>
            <input type="text" id="raga" name="raga" value="{raga}">

            <label for="mood">Mood</label>
            <select id="mood" name="mood">
{mood_options}
            </select>

            <button type="submit" class="button">Generate BGM</button>
        </form>"#,
        raga = escape_html(DEFAULT_RAGA),
    );

    Html(page("Upload", &content))
}
