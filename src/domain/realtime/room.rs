//! Typed room addressing.
//!
//! Two axes: one room per user (`user-<id>`) and one room per role
//! (`teacher`, `student`, `admin`). Every joined connection sits in exactly
//! one of each.

use std::fmt;

use crate::domain::foundation::{Role, UserId};

use super::identity::ConnectionIdentity;

/// A named broadcast group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoomAddress {
    /// `user-<id>`: every connection of one user.
    Personal(UserId),
    /// `teacher` / `student` / `admin`: every connection of one role.
    Role(Role),
}

impl RoomAddress {
    pub fn personal(user_id: &UserId) -> Self {
        RoomAddress::Personal(user_id.clone())
    }

    /// The two rooms a connection with this identity belongs to.
    pub fn identity_rooms(identity: &ConnectionIdentity) -> [RoomAddress; 2] {
        [
            RoomAddress::Personal(identity.user_id.clone()),
            RoomAddress::Role(identity.role),
        ]
    }

    /// Rooms reached by a broadcast notification.
    pub fn broadcast_rooms() -> [RoomAddress; 2] {
        [RoomAddress::Role(Role::Teacher), RoomAddress::Role(Role::Student)]
    }
}

impl fmt::Display for RoomAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomAddress::Personal(user_id) => write!(f, "user-{}", user_id),
            RoomAddress::Role(role) => f.write_str(role.as_str()),
        }
    }
}
