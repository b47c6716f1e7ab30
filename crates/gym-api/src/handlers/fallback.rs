use axum::http::StatusCode;

/// Plain-text 404 for unknown paths and unsupported methods
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}
