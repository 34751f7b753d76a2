//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod notification;

pub use notification::{
    CreateNotificationCommand, CreateNotificationHandler, CreateNotificationResult,
    ListNotificationsHandler, ListNotificationsQuery, MarkNotificationReadCommand,
    MarkNotificationReadHandler, MarkNotificationReadResult,
};
