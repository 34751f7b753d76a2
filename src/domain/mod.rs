//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, roles, errors)
//! - `notification` - Notification entity, types and audiences
//! - `realtime` - Handshake identity, rooms, connection lifecycle, domain updates

pub mod foundation;
pub mod notification;
pub mod realtime;
