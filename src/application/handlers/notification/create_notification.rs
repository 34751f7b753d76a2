//! CreateNotificationHandler - Command handler for admin/teacher notifications.
//!
//! Stores the rows first, then hands each stored row to the realtime
//! publisher. A recipient list produces one row per accepted recipient; no
//! list produces a single broadcast row.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, UserId};
use crate::domain::notification::{Notification, NotificationError, NotificationType, Recipients};
use crate::ports::{NotificationRepository, RealtimePublisher};

/// Command to create a notification.
#[derive(Debug, Clone)]
pub struct CreateNotificationCommand {
    pub author: AuthenticatedUser,
    pub kind: NotificationType,
    pub content: String,
    pub exam_id: Option<String>,
    pub user_ids: Option<Vec<UserId>>,
}

/// Result of a successful create.
#[derive(Debug, Clone)]
pub struct CreateNotificationResult {
    /// Stored rows, one per accepted recipient or a single broadcast row.
    pub notifications: Vec<Notification>,
    /// Connections the rows were pushed to.
    pub delivered: usize,
}

pub struct CreateNotificationHandler {
    repository: Arc<dyn NotificationRepository>,
    publisher: Arc<dyn RealtimePublisher>,
}

impl CreateNotificationHandler {
    pub fn new(
        repository: Arc<dyn NotificationRepository>,
        publisher: Arc<dyn RealtimePublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateNotificationCommand,
    ) -> Result<CreateNotificationResult, NotificationError> {
        // 1. Authorize
        if !cmd.author.role.can_author_notifications() {
            return Err(NotificationError::Forbidden(cmd.author.role));
        }

        // 2. Validate
        let template = Notification::new(cmd.kind, cmd.content, cmd.exam_id, None)?;

        // 3. Resolve rows
        let notifications = match Recipients::from_list(cmd.user_ids) {
            Recipients::Broadcast => vec![template],
            Recipients::Users(requested) => self
                .publisher
                .resolve_audience(cmd.kind, &requested)
                .await
                .into_iter()
                .map(|user_id| template.addressed_to(user_id))
                .collect(),
        };

        // 4. Persist
        for notification in &notifications {
            self.repository.save(notification).await?;
        }

        // 5. Fan out
        let mut delivered = 0;
        for notification in &notifications {
            delivered += self.publisher.deliver_notification(notification).await;
        }

        tracing::info!(
            author = %cmd.author.id,
            kind = %cmd.kind,
            rows = notifications.len(),
            delivered,
            "Notification created"
        );

        Ok(CreateNotificationResult {
            notifications,
            delivered,
        })
    }
}
