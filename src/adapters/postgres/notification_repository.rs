//! PostgreSQL implementation of NotificationRepository.
//!
//! Expects the portal's `notifications` table:
//!
//! ```sql
//! CREATE TABLE notifications (
//!     id          UUID PRIMARY KEY,
//!     user_id     TEXT NULL,          -- NULL = broadcast
//!     type        TEXT NOT NULL,
//!     content     TEXT NOT NULL,
//!     exam_id     TEXT NULL,
//!     created_at  TIMESTAMPTZ NOT NULL,
//!     is_read     BOOLEAN NOT NULL DEFAULT FALSE
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, NotificationId, Role, Timestamp, UserId};
use crate::domain::notification::{Notification, NotificationType};
use crate::ports::NotificationRepository;

pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a notification.
#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    user_id: Option<String>,
    #[sqlx(rename = "type")]
    kind: String,
    content: String,
    exam_id: Option<String>,
    created_at: DateTime<Utc>,
    is_read: bool,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DomainError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let kind: NotificationType = row
            .kind
            .parse()
            .map_err(|e| DomainError::database("Invalid notification type", e))?;

        let user_id = row
            .user_id
            .map(UserId::new)
            .transpose()
            .map_err(|e| DomainError::database("Invalid user_id", e))?;

        Ok(Notification {
            id: NotificationId::from_uuid(row.id),
            user_id,
            kind,
            content: row.content,
            exam_id: row.exam_id,
            created_at: Timestamp::from_datetime(row.created_at),
            is_read: row.is_read,
        })
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn save(&self, notification: &Notification) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, type, content, exam_id, created_at, is_read)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(notification.id.as_uuid())
        .bind(notification.user_id.as_ref().map(UserId::as_str))
        .bind(notification.kind.as_str())
        .bind(&notification.content)
        .bind(&notification.exam_id)
        .bind(notification.created_at.as_datetime())
        .bind(notification.is_read)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to save notification", e))?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        role: Role,
        limit: u32,
    ) -> Result<Vec<Notification>, DomainError> {
        let rows: Vec<NotificationRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, type, content, exam_id, created_at, is_read
            FROM notifications
            WHERE user_id = $1 OR (user_id IS NULL AND $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id.as_str())
        .bind(role.receives_broadcasts())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list notifications", e))?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        user_id: &UserId,
        role: Role,
    ) -> Result<Option<Notification>, DomainError> {
        let row: Option<NotificationRow> = sqlx::query_as(
            r#"
            UPDATE notifications SET is_read = TRUE
            WHERE id = $1 AND (user_id = $2 OR (user_id IS NULL AND $3))
            RETURNING id, user_id, type, content, exam_id, created_at, is_read
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .bind(role.receives_broadcasts())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to mark notification read", e))?;

        row.map(Notification::try_from).transpose()
    }
}
