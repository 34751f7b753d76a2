//! MarkNotificationReadHandler - flips `is_read` and tells the reader's
//! other tabs.

use std::sync::Arc;

use crate::domain::foundation::{NotificationId, Role, UserId};
use crate::domain::notification::{Notification, NotificationError};
use crate::domain::realtime::DomainUpdate;
use crate::ports::{NotificationRepository, RealtimePublisher};

#[derive(Debug, Clone)]
pub struct MarkNotificationReadCommand {
    pub user_id: UserId,
    pub role: Role,
    pub notification_id: NotificationId,
}

#[derive(Debug, Clone)]
pub struct MarkNotificationReadResult {
    pub notification: Notification,
    pub delivered: usize,
}

pub struct MarkNotificationReadHandler {
    repository: Arc<dyn NotificationRepository>,
    publisher: Arc<dyn RealtimePublisher>,
}

impl MarkNotificationReadHandler {
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
        cmd: MarkNotificationReadCommand,
    ) -> Result<MarkNotificationReadResult, NotificationError> {
        let notification = self
            .repository
            .mark_read(&cmd.notification_id, &cmd.user_id, cmd.role)
            .await?
            .ok_or(NotificationError::NotFound(cmd.notification_id))?;

        let delivered = self
            .publisher
            .publish_update(DomainUpdate::NotificationRead {
                user_id: cmd.user_id,
                notification_id: cmd.notification_id,
            })
            .await;

        Ok(MarkNotificationReadResult {
            notification,
            delivered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryNotificationRepository;
    use crate::domain::notification::{NotificationType, Recipients};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPublisher {
        updates: Mutex<Vec<DomainUpdate>>,
    }

    #[async_trait]
    impl RealtimePublisher for RecordingPublisher {
        async fn resolve_audience(&self, _: NotificationType, _: &[UserId]) -> Vec<UserId> {
            Vec::new()
        }

        async fn dispatch_notification(&self, _: &Notification, _: &Recipients) -> usize {
            0
        }

        async fn deliver_notification(&self, _: &Notification) -> usize {
            0
        }

        async fn publish_update(&self, update: DomainUpdate) -> usize {
            self.updates.lock().unwrap().push(update);
            1
        }
    }

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    #[tokio::test]
    async fn marks_read_and_publishes_to_reader() {
        let repo = Arc::new(InMemoryNotificationRepository::new());
        let n = Notification::new(NotificationType::Result, "Graded", None, Some(uid("s1"))).unwrap();
        repo.save(&n).await.unwrap();
        let publisher = Arc::new(RecordingPublisher::default());
        let handler = MarkNotificationReadHandler::new(repo, publisher.clone());

        let result = handler
            .handle(MarkNotificationReadCommand {
                user_id: uid("s1"),
                role: Role::Student,
                notification_id: n.id,
            })
            .await
            .unwrap();

        assert!(result.notification.is_read);
        assert_eq!(
            publisher.updates.lock().unwrap()[0],
            DomainUpdate::NotificationRead {
                user_id: uid("s1"),
                notification_id: n.id
            }
        );
    }

    #[tokio::test]
    async fn foreign_notification_is_not_found_and_not_published() {
        let repo = Arc::new(InMemoryNotificationRepository::new());
        let n = Notification::new(NotificationType::Result, "Graded", None, Some(uid("s1"))).unwrap();
        repo.save(&n).await.unwrap();
        let publisher = Arc::new(RecordingPublisher::default());
        let handler = MarkNotificationReadHandler::new(repo, publisher.clone());

        let result = handler
            .handle(MarkNotificationReadCommand {
                user_id: uid("s2"),
                role: Role::Student,
                notification_id: n.id,
            })
            .await;

        assert_eq!(result.unwrap_err(), NotificationError::NotFound(n.id));
        assert!(publisher.updates.lock().unwrap().is_empty());
    }
}
