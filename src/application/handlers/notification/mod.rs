//! Notification command and query handlers.

mod create_notification;
mod list_notifications;
mod mark_notification_read;

pub use create_notification::{
    CreateNotificationCommand, CreateNotificationHandler, CreateNotificationResult,
};
pub use list_notifications::{
    ListNotificationsHandler, ListNotificationsQuery, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
pub use mark_notification_read::{
    MarkNotificationReadCommand, MarkNotificationReadHandler, MarkNotificationReadResult,
};
