use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::http::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared-secret check. Runs before every handler; a missing or wrong key
/// never reaches the query service.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    match presented {
        Some(key) if key == state.config.api_key => next.run(request).await,
        _ => (
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({ "detail": "Invalid API key" })),
        )
            .into_response(),
    }
}
