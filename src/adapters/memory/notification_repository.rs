//! In-memory notification store.
//!
//! Used when no database is configured and by tests. Contents are lost on
//! restart.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, NotificationId, Role, UserId};
use crate::domain::notification::Notification;
use crate::ports::NotificationRepository;

#[derive(Default)]
pub struct InMemoryNotificationRepository {
    rows: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// All stored rows, in insertion order.
    pub async fn all(&self) -> Vec<Notification> {
        self.rows.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn save(&self, notification: &Notification) -> Result<(), DomainError> {
        self.rows.write().await.push(notification.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        role: Role,
        limit: u32,
    ) -> Result<Vec<Notification>, DomainError> {
        let rows = self.rows.read().await;
        let mut visible: Vec<Notification> = rows
            .iter()
            .filter(|n| n.is_visible_to(user_id, role))
            .cloned()
            .collect();

        // Newest first. Ties go to the later insert.
        visible.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        visible.reverse();
        visible.truncate(limit as usize);
        Ok(visible)
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        user_id: &UserId,
        role: Role,
    ) -> Result<Option<Notification>, DomainError> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows
            .iter_mut()
            .find(|n| n.id == *id && n.is_visible_to(user_id, role))
        else {
            return Ok(None);
        };

        row.mark_read();
        Ok(Some(row.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::NotificationType;

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    fn note(content: &str, user: Option<&str>) -> Notification {
        Notification::new(NotificationType::System, content, None, user.map(uid)).unwrap()
    }

    #[tokio::test]
    async fn list_includes_own_and_broadcast_rows_newest_first() {
        let repo = InMemoryNotificationRepository::new();
        repo.save(&note("first", Some("s1"))).await.unwrap();
        repo.save(&note("other user", Some("s2"))).await.unwrap();
        repo.save(&note("broadcast", None)).await.unwrap();

        let listed = repo.list_for_user(&uid("s1"), Role::Student, 10).await.unwrap();

        let contents: Vec<_> = listed.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents.len(), 2);
        assert!(contents.contains(&"first"));
        assert!(contents.contains(&"broadcast"));
        assert!(listed[0].created_at >= listed[1].created_at);
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let repo = InMemoryNotificationRepository::new();
        for i in 0..5 {
            repo.save(&note(&format!("n{}", i), Some("s1"))).await.unwrap();
        }

        assert_eq!(repo.list_for_user(&uid("s1"), Role::Student, 3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn mark_read_flips_flag_for_owner() {
        let repo = InMemoryNotificationRepository::new();
        let n = note("graded", Some("s1"));
        repo.save(&n).await.unwrap();

        let updated = repo.mark_read(&n.id, &uid("s1"), Role::Student).await.unwrap().unwrap();

        assert!(updated.is_read);
        assert!(repo.all().await[0].is_read);
    }

    #[tokio::test]
    async fn mark_read_hides_other_users_rows() {
        let repo = InMemoryNotificationRepository::new();
        let n = note("graded", Some("s1"));
        repo.save(&n).await.unwrap();

        assert_eq!(repo.mark_read(&n.id, &uid("s2"), Role::Student).await.unwrap(), None);
        assert!(!repo.all().await[0].is_read);
    }

    #[tokio::test]
    async fn admins_neither_list_nor_mark_broadcast_rows() {
        let repo = InMemoryNotificationRepository::new();
        let broadcast = note("maintenance", None);
        repo.save(&broadcast).await.unwrap();
        repo.save(&note("schedule", Some("a1"))).await.unwrap();

        let listed = repo.list_for_user(&uid("a1"), Role::Admin, 10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content, "schedule");

        assert_eq!(repo.mark_read(&broadcast.id, &uid("a1"), Role::Admin).await.unwrap(), None);
        assert!(!repo.all().await[0].is_read);
    }

    #[tokio::test]
    async fn mark_read_unknown_id_returns_none() {
        let repo = InMemoryNotificationRepository::new();
        assert_eq!(
            repo.mark_read(&NotificationId::new(), &uid("s1"), Role::Student).await.unwrap(),
            None
        );
    }
}
