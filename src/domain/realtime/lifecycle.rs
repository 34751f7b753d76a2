//! Connection lifecycle states.
//!
//! ```text
//! connecting -> identified -> joined -> active -> disconnected
//!      \____________\____________\_________________^
//! ```
//!
//! Any live state may drop straight to `disconnected` (rejected handshake,
//! client close, network loss). `disconnected` is terminal: a reconnecting
//! client starts over from `connecting`.

use crate::domain::foundation::StateMachine;

/// Where a connection is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Connecting,
    Identified,
    Joined,
    Active,
    Disconnected,
}

impl ConnectionState {
    /// True once the connection is in its rooms and can receive events.
    pub fn can_receive(&self) -> bool {
        matches!(self, ConnectionState::Joined | ConnectionState::Active)
    }
}

impl StateMachine for ConnectionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConnectionState::*;
        matches!(
            (self, target),
            (Connecting, Identified)
                | (Identified, Joined)
                | (Joined, Active)
                | (Connecting, Disconnected)
                | (Identified, Disconnected)
                | (Joined, Disconnected)
                | (Active, Disconnected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConnectionState::*;
        match self {
            Connecting => vec![Identified, Disconnected],
            Identified => vec![Joined, Disconnected],
            Joined => vec![Active, Disconnected],
            Active => vec![Disconnected],
            Disconnected => vec![],
        }
    }
}
