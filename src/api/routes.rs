//! API route definitions
//!
//! - POST /ping - heartbeat from the camera reporter

use axum::{routing::post, Router};

use super::handlers::{self, ApiState};

/// Create all API routes
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/ping", post(handlers::post_ping))
        .with_state(state)
}
