//! Presence registry: the process-wide map of who is online.
//!
//! Keyed by user id, last write wins. The registry is advisory: the
//! fan-out engine consults it to resolve recipient roles, but delivery
//! always goes through rooms.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::foundation::{ConnectionId, Role, UserId};
use crate::domain::realtime::{PresenceEntry, ProfileUpdate};

#[derive(Default)]
pub struct PresenceRegistry {
    entries: RwLock<HashMap<UserId, PresenceEntry>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `user_id`. Returns the replaced entry.
    pub async fn upsert(&self, user_id: UserId, entry: PresenceEntry) -> Option<PresenceEntry> {
        self.entries.write().await.insert(user_id, entry)
    }

    /// Record a login announcement.
    ///
    /// The connection and role are overwritten, profile fields are merged
    /// into any existing entry. Returns the resulting entry.
    pub async fn update_profile(
        &self,
        user_id: &UserId,
        connection_id: ConnectionId,
        role: Role,
        profile: &ProfileUpdate,
    ) -> PresenceEntry {
        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(user_id.clone())
            .or_insert_with(|| PresenceEntry::connected(connection_id, role));

        entry.connection_id = connection_id;
        entry.role = role;
        entry.merge_profile(profile);
        entry.clone()
    }

    /// Remove the entry for `user_id`. Removing an absent user is a no-op.
    pub async fn remove(&self, user_id: &UserId) -> Option<PresenceEntry> {
        self.entries.write().await.remove(user_id)
    }

    pub async fn lookup(&self, user_id: &UserId) -> Option<PresenceEntry> {
        self.entries.read().await.get(user_id).cloned()
    }

    /// Roles of those `user_ids` that are currently online.
    pub async fn roles_of(&self, user_ids: &[UserId]) -> HashMap<UserId, Role> {
        let entries = self.entries.read().await;
        user_ids
            .iter()
            .filter_map(|id| entries.get(id).map(|entry| (id.clone(), entry.role)))
            .collect()
    }

    pub async fn online_count(&self) -> usize {
        self.entries.read().await.len()
    }
}
