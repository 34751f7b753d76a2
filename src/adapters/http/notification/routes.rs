//! Axum router configuration for notification endpoints.

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{
    create_notification, list_notifications, mark_notification_read, NotificationAppState,
};

/// Create the notification API router, to be nested under `/api`.
///
/// # Routes
/// - `GET /notifications` - List the caller's notifications
/// - `POST /notifications` - Create a notification (admin, teacher)
/// - `PUT /notifications/:id/read` - Mark a notification read
pub fn notification_routes() -> Router<NotificationAppState> {
    Router::new()
        .route("/notifications", get(list_notifications).post(create_notification))
        .route("/notifications/:id/read", put(mark_notification_read))
}
