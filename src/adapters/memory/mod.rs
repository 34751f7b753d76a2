//! In-memory adapters.
//!
//! Back the notification API when no database is configured, and stand in
//! for PostgreSQL in tests.

mod notification_repository;
mod user_directory;

pub use notification_repository::InMemoryNotificationRepository;
pub use user_directory::InMemoryUserDirectory;
