//! The four room endpoints: matchmake, state, action, quit.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use coup_core::errors::{ManagerError, RoomError};
use coup_core::net::{
    ActionRequestEnvelope, MatchmakeRequest, MatchmakeResponse, OkResponse, QuitRequest, StateQuery,
};
use coup_core::room::RoomView;
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wraps a [`ManagerError`] so it can be returned directly from a
/// handler and mapped to the right HTTP status.
pub struct ApiError(ManagerError);

impl From<ManagerError> for ApiError {
    fn from(err: ManagerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Malformed envelopes never reach here (axum's `Json` extractor
        // rejects those before a handler runs). Within a well-formed
        // envelope, domain-level rejections are absorbed with 200: the
        // phase doesn't change but the caller learns why nothing moved.
        let status = match &self.0 {
            ManagerError::UnknownRoom | ManagerError::UnknownPlayer => StatusCode::NOT_FOUND,
            ManagerError::Room(RoomError::Invariant(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ManagerError::Room(_) => StatusCode::OK,
        };
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}

pub async fn matchmake(
    State(state): State<AppState>,
    Json(body): Json<MatchmakeRequest>,
) -> Json<MatchmakeResponse> {
    let start = std::time::Instant::now();
    let (player_id, game_id, _seat) = state.rooms.matchmake(body.name);
    crate::metrics::matchmake_latency_ms(start.elapsed().as_secs_f64() * 1000.0);
    Json(MatchmakeResponse { player_id, game_id })
}

pub async fn state(
    State(state): State<AppState>,
    Query(query): Query<StateQuery>,
) -> Result<Json<RoomView>, ApiError> {
    let view = state.rooms.state(query.player_id, query.game_id)?;
    Ok(Json(view))
}

pub async fn action(
    State(state): State<AppState>,
    Json(body): Json<ActionRequestEnvelope>,
) -> Result<Json<OkResponse>, ApiError> {
    state.rooms.act(body.player_id, body.game_id, body.payload.into())?;
    Ok(Json(OkResponse::default()))
}

pub async fn quit(
    State(state): State<AppState>,
    Json(body): Json<QuitRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    state.rooms.quit(body.player_id, body.game_id)?;
    Ok(Json(OkResponse::default()))
}
