//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `NotificationRepository` - notification rows (PostgreSQL / in-memory)
//! - `UserDirectory` - role lookup for offline users
//! - `TokenVerifier` - bearer token verification
//! - `RealtimePublisher` - post-commit fan-out entry point for mutation handlers

mod notification_repository;
mod realtime_publisher;
mod token_verifier;
mod user_directory;

pub use notification_repository::NotificationRepository;
pub use realtime_publisher::RealtimePublisher;
pub use token_verifier::TokenVerifier;
pub use user_directory::UserDirectory;
