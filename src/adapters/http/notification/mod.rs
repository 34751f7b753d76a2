//! HTTP adapter for notification endpoints.
//!
//! - `GET /api/notifications` - The caller's notifications
//! - `POST /api/notifications` - Create and push a notification
//! - `PUT /api/notifications/:id/read` - Mark a notification read

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{NotificationApiError, NotificationAppState};
pub use routes::notification_routes;
