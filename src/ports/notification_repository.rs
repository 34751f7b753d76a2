//! Notification repository port.
//!
//! Durable home of notification rows. The realtime layer never writes here;
//! mutation handlers save first and fan out afterwards, and reconnecting
//! clients read their backlog through `list_for_user`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, NotificationId, Role, UserId};
use crate::domain::notification::Notification;

/// Repository port for notification persistence.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a new notification row.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, notification: &Notification) -> Result<(), DomainError>;

    /// Notifications visible to `user_id`: rows addressed to them plus,
    /// when `role` receives broadcasts, broadcast rows. Newest first, at
    /// most `limit`.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        role: Role,
        limit: u32,
    ) -> Result<Vec<Notification>, DomainError>;

    /// Mark a notification read on behalf of `user_id`.
    ///
    /// Returns the updated row, or `None` when no row with that id is
    /// visible to the user under the same rules as `list_for_user`.
    async fn mark_read(
        &self,
        id: &NotificationId,
        user_id: &UserId,
        role: Role,
    ) -> Result<Option<Notification>, DomainError>;
}
