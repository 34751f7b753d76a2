//! WebSocket upgrade handler for realtime connections.
//!
//! Handles the HTTP → WebSocket upgrade and drives the connection lifecycle:
//! 1. Validate the handshake claim (and token, when required)
//! 2. Upgrade to WebSocket
//! 3. Join identity rooms and record presence
//! 4. Forward queued events and handle client frames until disconnect
//! 5. Leave rooms, drop presence, announce logout

use axum::{
    extract::{
        rejection::QueryRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};

use crate::domain::realtime::{ConnectionIdentity, HandshakeQuery, IdentityError};

use super::session::RealtimeHub;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub hub: RealtimeHub,
}

impl WebSocketState {
    pub fn new(hub: RealtimeHub) -> Self {
        Self { hub }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET <socket_path>?userId=<id>&role=<role>[&token=<jwt>]`
///
/// The claim is checked before the upgrade headers, so a rejected handshake
/// never upgrades and the client sees a plain 400/401. A valid claim on a
/// plain GET gets 426. A query string that cannot be decoded at all is
/// refused with 400 like any other malformed claim.
pub async fn ws_handler(
    ws: Option<WebSocketUpgrade>,
    query: Result<Query<HandshakeQuery>, QueryRejection>,
    State(state): State<WebSocketState>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected socket handshake");
            return (StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };

    match state.hub.authenticate(&query).await {
        Ok(identity) => match ws {
            Some(ws) => ws.on_upgrade(move |socket| handle_socket(socket, identity, state.hub)),
            None => (StatusCode::UPGRADE_REQUIRED, "expected a websocket upgrade").into_response(),
        },
        Err(err) => {
            tracing::warn!(
                user_id = query.user_id.as_deref().unwrap_or(""),
                role = query.role.as_deref().unwrap_or(""),
                error = %err,
                "Rejected socket handshake"
            );
            (rejection_status(&err), err.to_string()).into_response()
        }
    }
}

fn rejection_status(err: &IdentityError) -> StatusCode {
    match err {
        IdentityError::MissingUserId | IdentityError::MissingRole | IdentityError::UnknownRole(_) => {
            StatusCode::BAD_REQUEST
        }
        IdentityError::MissingToken
        | IdentityError::TokenRejected(_)
        | IdentityError::ClaimMismatch => StatusCode::UNAUTHORIZED,
    }
}

/// Handle an established WebSocket connection.
///
/// Runs for the lifetime of the connection. The writer task drains the
/// connection's outbound queue; this task reads client frames.
async fn handle_socket(socket: WebSocket, identity: ConnectionIdentity, hub: RealtimeHub) {
    let (mut sender, mut receiver) = socket.split();
    let (mut session, mut outbound) = hub.open(identity).await;
    let connection_id = session.id();

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let frame = match event.to_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::error!(connection_id = %connection_id, "Failed to encode event: {}", e);
                    continue;
                }
            };
            if let Err(e) = sender.send(Message::Text(frame)).await {
                tracing::debug!(
                    connection_id = %connection_id,
                    "Send error, closing connection: {}",
                    e
                );
                break;
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut send_task => break,
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => session.handle_frame(&text).await,
                Some(Ok(Message::Binary(_))) => {
                    tracing::warn!(connection_id = %connection_id, "Received unsupported binary message");
                }
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                    // Protocol-level heartbeat, answered by axum
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!(connection_id = %connection_id, "Client closed connection");
                    break;
                }
                Some(Err(e)) => {
                    tracing::debug!(connection_id = %connection_id, "Receive error: {}", e);
                    break;
                }
            }
        }
    }

    send_task.abort();
    session.close().await;
}

/// Create axum router for the WebSocket endpoint.
pub fn websocket_router(socket_path: &str) -> Router<WebSocketState> {
    Router::new().route(socket_path, get(ws_handler))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_claims_are_bad_requests() {
        assert_eq!(rejection_status(&IdentityError::MissingUserId), StatusCode::BAD_REQUEST);
        assert_eq!(
            rejection_status(&IdentityError::UnknownRole("guest".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn token_failures_are_unauthorized() {
        assert_eq!(rejection_status(&IdentityError::MissingToken), StatusCode::UNAUTHORIZED);
        assert_eq!(rejection_status(&IdentityError::ClaimMismatch), StatusCode::UNAUTHORIZED);
    }
}
