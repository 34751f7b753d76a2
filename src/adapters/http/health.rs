//! Liveness endpoint with realtime counters.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::adapters::websocket::{PresenceRegistry, RoomManager};

#[derive(Clone)]
pub struct HealthState {
    pub rooms: Arc<RoomManager>,
    pub presence: Arc<PresenceRegistry>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub connections: usize,
    pub online_users: usize,
}

/// GET /health
pub async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        connections: state.rooms.connection_count().await,
        online_users: state.presence.online_count().await,
    })
}

pub fn health_router() -> Router<HealthState> {
    Router::new().route("/health", get(health))
}
