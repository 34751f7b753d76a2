//! Top-level router: `/api` notifications, `/health` and the socket route.
//!
//! Cross-cutting layers (trace, CORS, timeout) are added by the binary.

use std::sync::Arc;

use axum::{middleware, Router};

use crate::adapters::websocket::{websocket_router, WebSocketState};
use crate::ports::{TokenVerifier, UserDirectory};

use super::health::{health_router, HealthState};
use super::middleware::{auth_middleware, AuthState};
use super::notification::{notification_routes, NotificationAppState};

/// Everything the HTTP surface needs.
#[derive(Clone)]
pub struct AppState {
    pub notifications: NotificationAppState,
    pub health: HealthState,
    pub websocket: WebSocketState,
    pub verifier: Arc<dyn TokenVerifier>,
    pub directory: Arc<dyn UserDirectory>,
}

pub fn build_router(state: AppState, socket_path: &str) -> Router {
    let auth = AuthState {
        verifier: state.verifier,
        directory: state.directory,
    };
    let api = notification_routes()
        .with_state(state.notifications)
        .layer(middleware::from_fn_with_state(auth, auth_middleware));

    Router::new()
        .nest("/api", api)
        .merge(health_router().with_state(state.health))
        .merge(websocket_router(socket_path).with_state(state.websocket))
}
