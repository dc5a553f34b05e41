//! API key authentication middleware
//!
//! When `ApiConfig::api_key` is set, every request must carry the matching
//! `X-Api-Key` header or it is answered with 401 before reaching a handler.
//! With no key configured the middleware is a pass-through.

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Enforce the configured API key on every request.
///
/// Layered via `middleware::from_fn_with_state` with the configured key as
/// state; a `None` state disables the check entirely. Key comparison is
/// constant-time.
pub async fn require_api_key(
    State(expected_api_key): State<Option<String>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected_key) = expected_api_key else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if constant_time_eq(key.as_bytes(), expected_key.as_bytes()) => {
            next.run(request).await
        }
        Some(_) => unauthorized("Invalid API key"),
        None => unauthorized("Missing X-Api-Key header"),
    }
}

/// Byte comparison that always touches every byte, so the response time
/// does not leak where the first mismatch sits
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

fn unauthorized(message: &str) -> Response {
    let body = Json(json!({
        "error": {
            "code": "unauthorized",
            "message": message
        }
    }));

    (StatusCode::UNAUTHORIZED, body).into_response()
}
