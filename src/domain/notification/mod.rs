//! Notifications pushed to portal users.
//!
//! A notification is addressed either to one user (`user_id` set) or to
//! every teacher and student (`user_id = None`). Its type decides which
//! roles a targeted notification may reach.

mod errors;
mod notification;

pub use errors::NotificationError;
pub use notification::{Notification, NotificationType, Recipients};
