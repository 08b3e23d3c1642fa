//! API route handlers
//!
//! The only inbound endpoint is the heartbeat sink. The body is decoded by
//! hand rather than through axum's `Json` extractor because reporters do not
//! always send a `Content-Type` header; a header-less body is read as JSON.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

use crate::liveness::HeartbeatReceiver;
use crate::storage::format_timestamp;
use crate::types::{PingAck, PingPayload};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub receiver: HeartbeatReceiver,
}

impl ApiState {
    pub fn new(receiver: HeartbeatReceiver) -> Self {
        Self { receiver }
    }
}

// ============================================================================
// Heartbeat
// ============================================================================

/// POST /ping: record a heartbeat
///
/// - 415 when a `Content-Type` other than JSON is declared
/// - 422 when the body is not a `{"cameras": {...}}` object
pub async fn post_ping(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !is_json_body(&headers) {
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected request with `Content-Type: application/json`",
        )
            .into_response();
    }

    let payload: PingPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Rejected heartbeat body: {}", e);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Invalid heartbeat body: {}", e),
            )
                .into_response();
        }
    };

    let at = state.receiver.record(&payload).await;
    (StatusCode::OK, Json(PingAck::ok(format_timestamp(at)))).into_response()
}

/// True when the body should be decoded as JSON: no `Content-Type` at all,
/// `application/json`, or any `application/*+json` type.
fn is_json_body(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return true;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };

    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_content_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_missing_content_type_is_json() {
        assert!(is_json_body(&HeaderMap::new()));
    }

    #[test]
    fn test_json_content_types() {
        assert!(is_json_body(&with_content_type("application/json")));
        assert!(is_json_body(&with_content_type("application/json; charset=utf-8")));
        assert!(is_json_body(&with_content_type("Application/JSON")));
        assert!(is_json_body(&with_content_type("application/vnd.api+json")));
    }

    #[test]
    fn test_other_content_types_rejected() {
        assert!(!is_json_body(&with_content_type("text/plain")));
        assert!(!is_json_body(&with_content_type("application/x-www-form-urlencoded")));
        assert!(!is_json_body(&with_content_type("text/json+html")));
    }
}
