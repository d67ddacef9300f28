//! Static asset handlers, embedded at compile time

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

const RAGA_BGM_CSS: &str = include_str!("../../../static/raga-bgm.css");

/// GET /static/raga-bgm.css
pub async fn serve_raga_bgm_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        RAGA_BGM_CSS,
    )
        .into_response()
}
