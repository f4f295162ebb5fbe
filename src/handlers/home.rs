use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Serves the upload form.
pub async fn home_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
