//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the exam portal realtime core.

mod auth;
mod errors;
mod ids;
mod role;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ConnectionId, NotificationId, UserId};
pub use role::Role;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
