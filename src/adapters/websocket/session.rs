//! Connection lifecycle, independent of the socket transport.
//!
//! `RealtimeHub::authenticate` runs before the upgrade and decides whether a
//! handshake may reach `identified`. `RealtimeHub::open` then registers the
//! connection, joins its rooms and records presence. The returned
//! `ConnectionSession` handles inbound frames until `close`.

use std::sync::Arc;

use crate::domain::foundation::{ConnectionId, Role, StateMachine, UserId};
use crate::domain::notification::{Notification, Recipients};
use crate::domain::realtime::{
    ConnectionIdentity, ConnectionState, HandshakeQuery, IdentityError, PresenceEntry,
};
use crate::ports::{RealtimePublisher, TokenVerifier};

use super::fanout::FanoutEngine;
use super::messages::{ClientEvent, NotificationRequest, RoomClaim, ServerEvent, UserLoginPayload};
use super::presence::PresenceRegistry;
use super::rooms::{OutboundReceiver, RoomManager};

/// Shared realtime components, cheap to clone.
#[derive(Clone)]
pub struct RealtimeHub {
    rooms: Arc<RoomManager>,
    presence: Arc<PresenceRegistry>,
    fanout: Arc<FanoutEngine>,
    verifier: Option<Arc<dyn TokenVerifier>>,
}

impl RealtimeHub {
    pub fn new(
        rooms: Arc<RoomManager>,
        presence: Arc<PresenceRegistry>,
        fanout: Arc<FanoutEngine>,
    ) -> Self {
        Self {
            rooms,
            presence,
            fanout,
            verifier: None,
        }
    }

    /// Require handshakes to carry a token whose subject and role match the
    /// claimed identity.
    pub fn with_handshake_verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn rooms(&self) -> &Arc<RoomManager> {
        &self.rooms
    }

    pub fn presence(&self) -> &Arc<PresenceRegistry> {
        &self.presence
    }

    /// Validates a handshake claim.
    ///
    /// # Errors
    ///
    /// Any `IdentityError`; the caller must refuse the connection.
    pub async fn authenticate(
        &self,
        query: &HandshakeQuery,
    ) -> Result<ConnectionIdentity, IdentityError> {
        let identity = ConnectionIdentity::from_handshake(query)?;

        let Some(verifier) = &self.verifier else {
            return Ok(identity);
        };

        let token = query
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(IdentityError::MissingToken)?;

        let user = verifier
            .verify(token)
            .await
            .map_err(|e| IdentityError::TokenRejected(e.to_string()))?;

        if user.id != identity.user_id || user.role != identity.role {
            return Err(IdentityError::ClaimMismatch);
        }
        Ok(identity)
    }

    /// Brings an identified connection to `active`.
    ///
    /// Returns the session and the receiver its writer task must drain.
    pub async fn open(&self, identity: ConnectionIdentity) -> (ConnectionSession, OutboundReceiver) {
        let id = ConnectionId::new();
        let mut session = ConnectionSession {
            id,
            identity,
            state: ConnectionState::Identified,
            hub: self.clone(),
        };

        let outbound = self.rooms.register(id).await;
        if self.rooms.join_identity_rooms(id, &session.identity).await {
            session.advance(ConnectionState::Joined);
        }

        self.presence
            .upsert(
                session.identity.user_id.clone(),
                PresenceEntry::connected(id, session.identity.role),
            )
            .await;
        self.fanout
            .remember(&session.identity.user_id, session.identity.role)
            .await;
        session.advance(ConnectionState::Active);

        tracing::info!(
            connection_id = %id,
            user_id = %session.identity.user_id,
            role = %session.identity.role,
            "Connection active"
        );

        (session, outbound)
    }
}

/// One live connection.
pub struct ConnectionSession {
    id: ConnectionId,
    identity: ConnectionIdentity,
    state: ConnectionState,
    hub: RealtimeHub,
}

impl ConnectionSession {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn identity(&self) -> &ConnectionIdentity {
        &self.identity
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    fn advance(&mut self, next: ConnectionState) {
        match self.state.transition_to(next) {
            Ok(state) => self.state = state,
            Err(err) => {
                tracing::warn!(connection_id = %self.id, error = %err, "Ignoring lifecycle transition");
            }
        }
    }

    /// Handles one inbound text frame. Unparseable frames are ignored.
    pub async fn handle_frame(&mut self, text: &str) {
        if !self.state.can_receive() {
            return;
        }

        let event = match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => event,
            Err(err) => {
                tracing::debug!(connection_id = %self.id, error = %err, "Ignoring unparseable frame");
                return;
            }
        };

        match event {
            ClientEvent::JoinRoom(claim) => self.on_join_room(claim).await,
            ClientEvent::UserLogin(payload) => self.on_user_login(payload).await,
            ClientEvent::NotificationCreated(request) => self.on_notification(request).await,
            ClientEvent::Ping => {
                tracing::trace!(connection_id = %self.id, "Received ping");
                self.hub.rooms.send_to_connection(&self.id, ServerEvent::Pong).await;
            }
        }
    }

    fn matches_identity(&self, user_id: &UserId, role: Role) -> bool {
        *user_id == self.identity.user_id && role == self.identity.role
    }

    async fn on_join_room(&mut self, claim: RoomClaim) {
        if !self.matches_identity(&claim.user_id, claim.role) {
            tracing::warn!(
                connection_id = %self.id,
                user_id = %self.identity.user_id,
                claimed_user_id = %claim.user_id,
                claimed_role = %claim.role,
                "join-room does not match handshake identity, ignoring"
            );
            return;
        }
        self.hub.rooms.reaffirm(self.id, &self.identity).await;
    }

    async fn on_user_login(&mut self, payload: UserLoginPayload) {
        if !self.matches_identity(&payload.user_id, payload.role) {
            tracing::warn!(
                connection_id = %self.id,
                user_id = %self.identity.user_id,
                claimed_user_id = %payload.user_id,
                "user-login does not match handshake identity, ignoring"
            );
            return;
        }

        self.hub
            .presence
            .update_profile(&self.identity.user_id, self.id, self.identity.role, &payload.profile())
            .await;
        let delivered = self.hub.fanout.announce_login(&self.id, payload).await;
        tracing::debug!(connection_id = %self.id, delivered, "Announced login");
    }

    async fn on_notification(&mut self, request: NotificationRequest) {
        if !self.identity.role.can_author_notifications() {
            tracing::warn!(
                connection_id = %self.id,
                user_id = %self.identity.user_id,
                role = %self.identity.role,
                "notification-created from a role that cannot author notifications, ignoring"
            );
            return;
        }

        let notification =
            match Notification::new(request.kind, request.content, request.exam_id, None) {
                Ok(notification) => notification,
                Err(err) => {
                    tracing::warn!(connection_id = %self.id, error = %err, "Rejected client notification");
                    return;
                }
            };

        let recipients = Recipients::from_list(request.user_ids);
        let delivered = self
            .hub
            .fanout
            .dispatch_notification(&notification, &recipients)
            .await;
        tracing::debug!(
            connection_id = %self.id,
            notification_id = %notification.id,
            delivered,
            "Relayed client notification"
        );
    }

    /// Leaves every room, drops presence and announces the logout.
    /// Calling it again is a no-op.
    pub async fn close(&mut self) {
        if self.state.is_terminal() {
            return;
        }

        self.hub.rooms.leave(&self.id).await;
        self.hub.presence.remove(&self.identity.user_id).await;
        self.advance(ConnectionState::Disconnected);
        self.hub.fanout.announce_logout(&self.identity.user_id).await;

        tracing::info!(
            connection_id = %self.id,
            user_id = %self.identity.user_id,
            "Connection closed"
        );
    }
}
