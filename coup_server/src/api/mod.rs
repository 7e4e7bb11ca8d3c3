//! HTTP API for the room server.
//!
//! # Endpoints
//!
//! ```text
//! POST /matchmake   - seat a new player in the oldest open room (public)
//! GET  /state        - the caller's sanitized view of their room
//! POST /action       - declare an action, respond, lose influence, or exchange
//! POST /quit         - leave the game for good
//! GET  /health        - liveness check
//! GET  /metrics       - Prometheus scrape endpoint
//! ```

pub mod request_id;
pub mod rooms;

use std::sync::Arc;

use axum::{
    Router,
    response::IntoResponse,
    routing::{get, post},
};
use coup_core::manager::RoomManager;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RoomManager>,
}

/// Build the full router: the four game endpoints, a health check, and
/// request-id correlation on every route. CORS is permissive, matching
/// a server meant to be reachable from any browser client.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/matchmake", post(rooms::matchmake))
        .route("/state", get(rooms::state))
        .route("/action", post(rooms::action))
        .route("/quit", post(rooms::quit))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    "ok"
}
