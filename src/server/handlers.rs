// src/server/handlers.rs
// =============================================================================
// Request handlers.
//
// Only a malformed request is an HTTP error. A site that is down, slow or
// unresolvable is a normal answer: 200 with status null and an error message.
//
// Status codes:
// - 200: the probe ran (whatever the target did)
// - 400: the body is not JSON, or `url` is missing, not a string or blank
//
// Rust concepts:
// - Extractors: State<AppState> and Bytes are pulled out of the request by axum
// - IntoResponse: a (StatusCode, Json) tuple becomes a full HTTP response
// =============================================================================

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::AppState;

/// Error text for a body that is not JSON at all
pub const ERROR_INVALID_REQUEST: &str = "Invalid request";
/// Error text for a JSON body without a usable `url`
pub const ERROR_INVALID_URL: &str = "Invalid URL provided";

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

// The body is taken raw so both rejection messages stay under our control
// instead of axum's default Json rejection text.
pub async fn check_url(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            debug!("Rejecting unparseable request body: {}", e);
            return bad_request(ERROR_INVALID_REQUEST);
        }
    };

    // A string that is not a URL still goes to the prober; it comes back as a
    // failed result with an "Invalid URL: ..." error.
    let url = match payload.get("url").and_then(Value::as_str).map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => return bad_request(ERROR_INVALID_URL),
    };

    let result = state.prober.probe(&url).await;
    // Log the status code, or the error for failed probes
    info!(
        "Probed {} -> {}",
        url,
        result
            .status
            .map(|status| status.to_string())
            .or_else(|| result.error.clone())
            .unwrap_or_default()
    );

    (StatusCode::OK, Json(result)).into_response()
}

/// Liveness check for load balancers; does not probe anything.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
