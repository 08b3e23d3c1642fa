//! REST API module using Axum
//!
//! Exposes the heartbeat endpoint consumed by camera reporters. There is no
//! authentication and no other route.

pub mod handlers;
mod routes;

pub use handlers::ApiState;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    routes::api_routes(state).layer(TraceLayer::new_for_http())
}
