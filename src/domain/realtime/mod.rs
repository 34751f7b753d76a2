//! Realtime distribution vocabulary.
//!
//! - [`identity`] - handshake claims and their validation
//! - [`room`] - typed room addressing (`user-<id>` and role rooms)
//! - [`lifecycle`] - connection state machine
//! - [`presence`] - presence entries
//! - [`targeting`] - audience filtering for targeted notifications
//! - [`update`] - domain updates and their audiences

pub mod identity;
pub mod lifecycle;
pub mod presence;
pub mod room;
pub mod targeting;
pub mod update;

pub use identity::{ConnectionIdentity, HandshakeQuery, IdentityError};
pub use lifecycle::ConnectionState;
pub use presence::{PresenceEntry, ProfileUpdate};
pub use room::RoomAddress;
pub use targeting::{select_recipients, unique_ids};
pub use update::{DomainUpdate, UpdateTarget};
