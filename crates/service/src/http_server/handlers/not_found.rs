use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Fallback for anything outside the entry API.
///
/// Follows the entry handlers' error register: a short message naming what
/// was not found, as JSON when the caller asks for it, plain text otherwise.
pub async fn not_found_handler(uri: Uri, headers: HeaderMap) -> Response {
    let wants_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false);

    let message = format!("no such endpoint: {}", uri.path());
    if wants_json {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": message })),
        )
            .into_response()
    } else {
        (StatusCode::NOT_FOUND, message).into_response()
    }
}
