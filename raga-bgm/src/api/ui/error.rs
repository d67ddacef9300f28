//! Error page shown when a form submission fails

use axum::{http::StatusCode, response::Html};

use super::{escape_html, page};

/// Render a failed request for a browser, keeping the status reason visible
pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let reason = status.canonical_reason().unwrap_or("Error");
    let content = format!(
        r#"        <h2>{code} {reason}</h2>
        <p class="error">{message}</p>
        <p><a class="button" href="/">Back to the form</a></p>"#,
        code = status.as_u16(),
        reason = reason,
        message = escape_html(message),
    );

    Html(page("Composition failed", &content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_page_escapes_message() {
        let Html(html) = error_page(StatusCode::BAD_REQUEST, "Unknown mood '<Angry>'");
        assert!(html.contains("400 Bad Request"));
        assert!(html.contains("Unknown mood &#39;&lt;Angry&gt;&#39;"));
        assert!(html.contains(r#"href="/""#));
    }
}
