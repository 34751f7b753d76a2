//! Presence entries: who is online, on which connection, with what profile.

use serde::Serialize;

use crate::domain::foundation::{ConnectionId, Role};

/// The registry's snapshot of one online user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEntry {
    pub connection_id: ConnectionId,
    pub role: Role,
    pub username: Option<String>,
    pub full_name: Option<String>,
}

impl PresenceEntry {
    /// Entry created at handshake time, before any profile is known.
    pub fn connected(connection_id: ConnectionId, role: Role) -> Self {
        Self {
            connection_id,
            role,
            username: None,
            full_name: None,
        }
    }

    /// Merges profile fields announced after the handshake.
    ///
    /// Absent fields keep their current value.
    pub fn merge_profile(&mut self, profile: &ProfileUpdate) {
        if let Some(username) = &profile.username {
            self.username = Some(username.clone());
        }
        if let Some(full_name) = &profile.full_name {
            self.full_name = Some(full_name.clone());
        }
    }
}

/// Profile fields carried by a `user-login` announcement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub full_name: Option<String>,
}
