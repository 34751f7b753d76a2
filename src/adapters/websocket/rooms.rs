//! Room membership and per-connection delivery.
//!
//! Every live connection owns a bounded outbound queue and sits in exactly
//! two rooms: its personal room and its role room.
//!
//! # Architecture
//!
//! ```text
//! Room: user-s1     Room: student        Room: teacher    Room: admin
//! └── conn-a        ├── conn-a           └── conn-c       └── conn-d
//!                   └── conn-b
//! ```
//!
//! Emitting to a set of rooms delivers once per member of the union, so a
//! connection in two targeted rooms still receives a single copy.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

use crate::domain::foundation::ConnectionId;
use crate::domain::realtime::{ConnectionIdentity, RoomAddress};

use super::messages::ServerEvent;

/// Queue capacity used when none is configured.
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

/// What the writer task of a connection drains.
pub type OutboundReceiver = mpsc::Receiver<Arc<ServerEvent>>;

struct ConnectionSlot {
    sender: mpsc::Sender<Arc<ServerEvent>>,
    rooms: BTreeSet<RoomAddress>,
}

#[derive(Default)]
struct RoomState {
    connections: HashMap<ConnectionId, ConnectionSlot>,
    rooms: HashMap<RoomAddress, HashSet<ConnectionId>>,
}

impl RoomState {
    fn add_member(&mut self, connection_id: ConnectionId, room: RoomAddress) {
        if let Some(slot) = self.connections.get_mut(&connection_id) {
            slot.rooms.insert(room.clone());
            self.rooms.entry(room).or_default().insert(connection_id);
        }
    }

    fn deliver(&self, connection_id: &ConnectionId, event: &Arc<ServerEvent>) -> bool {
        let Some(slot) = self.connections.get(connection_id) else {
            return false;
        };

        match slot.sender.try_send(Arc::clone(event)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::debug!(
                    connection_id = %connection_id,
                    event = event.name(),
                    "Outbound queue full, dropping event"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::trace!(
                    connection_id = %connection_id,
                    event = event.name(),
                    "Outbound queue closed"
                );
                false
            }
        }
    }
}

/// Tracks which connections are in which rooms and hands events to their
/// outbound queues.
///
/// # Thread Safety
///
/// One `RwLock` guards both the membership maps and the queue senders so
/// joins and leaves are atomic with respect to emits. Emits only need the
/// read side because `try_send` never waits.
pub struct RoomManager {
    state: RwLock<RoomState>,
    outbound_buffer: usize,
}

impl RoomManager {
    /// Create a room manager whose connections buffer up to
    /// `outbound_buffer` undelivered events each.
    pub fn new(outbound_buffer: usize) -> Self {
        Self {
            state: RwLock::new(RoomState::default()),
            outbound_buffer: outbound_buffer.max(1),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_OUTBOUND_BUFFER)
    }

    /// Register a connection and return the receiving end of its queue.
    ///
    /// The connection is in no room yet; nothing reaches it until
    /// `join_identity_rooms` runs.
    pub async fn register(&self, connection_id: ConnectionId) -> OutboundReceiver {
        let (tx, rx) = mpsc::channel(self.outbound_buffer);
        let mut state = self.state.write().await;
        state.connections.insert(
            connection_id,
            ConnectionSlot {
                sender: tx,
                rooms: BTreeSet::new(),
            },
        );
        rx
    }

    /// Put a connection into its personal room and its role room.
    ///
    /// Returns `false` if the connection is not registered.
    pub async fn join_identity_rooms(
        &self,
        connection_id: ConnectionId,
        identity: &ConnectionIdentity,
    ) -> bool {
        let mut state = self.state.write().await;
        if !state.connections.contains_key(&connection_id) {
            return false;
        }
        for room in RoomAddress::identity_rooms(identity) {
            state.add_member(connection_id, room);
        }
        true
    }

    /// Idempotent re-join of the identity rooms.
    pub async fn reaffirm(&self, connection_id: ConnectionId, identity: &ConnectionIdentity) -> bool {
        self.join_identity_rooms(connection_id, identity).await
    }

    /// Remove a connection from every room and drop its queue.
    ///
    /// Rooms left empty are removed.
    pub async fn leave(&self, connection_id: &ConnectionId) {
        let mut state = self.state.write().await;
        let Some(slot) = state.connections.remove(connection_id) else {
            return;
        };

        for room in slot.rooms {
            if let Some(members) = state.rooms.get_mut(&room) {
                members.remove(connection_id);
                if members.is_empty() {
                    state.rooms.remove(&room);
                }
            }
        }
    }

    /// Emit to every member of one room. Returns the number of queues the
    /// event was placed on.
    pub async fn emit_to_room(&self, room: &RoomAddress, event: Arc<ServerEvent>) -> usize {
        self.emit_to_rooms(std::slice::from_ref(room), event).await
    }

    /// Emit once to every member of the union of `rooms`.
    pub async fn emit_to_rooms(&self, rooms: &[RoomAddress], event: Arc<ServerEvent>) -> usize {
        let state = self.state.read().await;

        let targets: HashSet<ConnectionId> = rooms
            .iter()
            .filter_map(|room| state.rooms.get(room))
            .flatten()
            .copied()
            .collect();

        targets
            .iter()
            .filter(|connection_id| state.deliver(connection_id, &event))
            .count()
    }

    /// Emit to every joined connection.
    pub async fn emit_to_all(&self, event: Arc<ServerEvent>) -> usize {
        self.emit_to_all_filtered(event, None).await
    }

    /// Emit to every joined connection except `origin`.
    pub async fn emit_to_all_except(&self, origin: &ConnectionId, event: Arc<ServerEvent>) -> usize {
        self.emit_to_all_filtered(event, Some(origin)).await
    }

    async fn emit_to_all_filtered(
        &self,
        event: Arc<ServerEvent>,
        excluded: Option<&ConnectionId>,
    ) -> usize {
        let state = self.state.read().await;
        state
            .connections
            .iter()
            .filter(|(id, slot)| !slot.rooms.is_empty() && Some(*id) != excluded)
            .filter(|(id, _)| state.deliver(id, &event))
            .count()
    }

    /// Send directly to one connection, regardless of rooms.
    pub async fn send_to_connection(&self, connection_id: &ConnectionId, event: ServerEvent) -> bool {
        let state = self.state.read().await;
        state.deliver(connection_id, &Arc::new(event))
    }

    /// Rooms a connection currently belongs to, in address order.
    pub async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomAddress> {
        let state = self.state.read().await;
        state
            .connections
            .get(connection_id)
            .map(|slot| slot.rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn member_count(&self, room: &RoomAddress) -> usize {
        let state = self.state.read().await;
        state.rooms.get(room).map(HashSet::len).unwrap_or(0)
    }

    /// Number of registered connections.
    pub async fn connection_count(&self) -> usize {
        self.state.read().await.connections.len()
    }

    pub async fn active_rooms(&self) -> Vec<RoomAddress> {
        let state = self.state.read().await;
        let mut rooms: Vec<_> = state.rooms.keys().cloned().collect();
        rooms.sort();
        rooms
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
