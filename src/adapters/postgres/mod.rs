//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresNotificationRepository` - notification rows
//! - `PostgresUserDirectory` - role lookup against the users table

mod notification_repository;
mod user_directory;

pub use notification_repository::PostgresNotificationRepository;
pub use user_directory::PostgresUserDirectory;
