//! HTML pages for the raga-bgm web front end
//!
//! - **Form** (`form`): upload form at `/`
//! - **Results** (`results`): rendered by `POST /compose` after a run
//! - **Error** (`error`): rendered by `POST /compose` when a browser submission fails
//! - **Static Assets** (`static_assets`): shared stylesheet

use axum::{routing::get, Router};

use crate::AppState;

pub mod error;
mod form;
pub mod results;
mod static_assets;

use form::form_page;
use static_assets::serve_raga_bgm_css;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(form_page))
        .route("/static/raga-bgm.css", get(serve_raga_bgm_css))
}

/// Wrap page content in the shared layout with the build-info header
pub(crate) fn page(title: &str, content: &str) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");
    let build_profile = env!("BUILD_PROFILE");
    let build_timestamp = env!("BUILD_TIMESTAMP");
    let short_hash: String = git_hash.chars().take(8).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/raga-bgm.css">
</head>
<body>
    <header>
        <div class="header-content">
            <div>
                <h1>Raga BGM Generator</h1>
                <p class="subtitle">{title}</p>
            </div>
            <div class="header-right">
                <div>raga-bgm v{version}</div>
                <div>{short_hash} ({build_profile})</div>
                <div>{build_timestamp}</div>
            </div>
        </div>
    </header>
    <div class="content">
{content}
    </div>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// Escape text for inclusion in HTML element content or attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
