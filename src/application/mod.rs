//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers persist first and publish to the realtime layer after.

pub mod handlers;

pub use handlers::{
    CreateNotificationCommand, CreateNotificationHandler, CreateNotificationResult,
    ListNotificationsHandler, ListNotificationsQuery, MarkNotificationReadCommand,
    MarkNotificationReadHandler, MarkNotificationReadResult,
};
