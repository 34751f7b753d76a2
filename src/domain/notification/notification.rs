//! Notification entity and its delivery addressing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{NotificationId, Role, Timestamp, UserId, ValidationError};

/// Business category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    System,
    Registration,
    RegistrationStatus,
    Reminder,
    Result,
    Assignment,
    AssignmentStatus,
    Other,
}

impl NotificationType {
    /// Roles a targeted notification of this type may reach.
    ///
    /// Assignment offers only concern teachers. Everything else goes to
    /// teachers and students; admins are never part of a notification
    /// audience.
    pub fn audience(&self) -> &'static [Role] {
        match self {
            NotificationType::Assignment => &[Role::Teacher],
            _ => &[Role::Teacher, Role::Student],
        }
    }

    /// Whether `role` is part of this type's audience.
    pub fn admits(&self, role: Role) -> bool {
        self.audience().contains(&role)
    }

    /// Storage tag, identical to the wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::System => "system",
            NotificationType::Registration => "registration",
            NotificationType::RegistrationStatus => "registration_status",
            NotificationType::Reminder => "reminder",
            NotificationType::Result => "result",
            NotificationType::Assignment => "assignment",
            NotificationType::AssignmentStatus => "assignment_status",
            NotificationType::Other => "other",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(NotificationType::System),
            "registration" => Ok(NotificationType::Registration),
            "registration_status" => Ok(NotificationType::RegistrationStatus),
            "reminder" => Ok(NotificationType::Reminder),
            "result" => Ok(NotificationType::Result),
            "assignment" => Ok(NotificationType::Assignment),
            "assignment_status" => Ok(NotificationType::AssignmentStatus),
            "other" => Ok(NotificationType::Other),
            other => Err(ValidationError::invalid_format(
                "type",
                format!("unknown notification type '{}'", other),
            )),
        }
    }
}

/// A notification as stored and as pushed to clients.
///
/// `user_id = None` marks a broadcast notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: Option<UserId>,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub content: String,
    pub exam_id: Option<String>,
    pub created_at: Timestamp,
    pub is_read: bool,
}

impl Notification {
    /// Creates a fresh, unread notification.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyField` if `content` is blank.
    pub fn new(
        kind: NotificationType,
        content: impl Into<String>,
        exam_id: Option<String>,
        user_id: Option<UserId>,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ValidationError::empty_field("content"));
        }

        Ok(Self {
            id: NotificationId::new(),
            user_id,
            kind,
            content,
            exam_id: exam_id.filter(|id| !id.trim().is_empty()),
            created_at: Timestamp::now(),
            is_read: false,
        })
    }

    /// Copy of this notification addressed to a single recipient.
    ///
    /// Gets its own id, since each recipient owns a separate row.
    pub fn addressed_to(&self, user_id: UserId) -> Self {
        Self {
            id: NotificationId::new(),
            user_id: Some(user_id),
            ..self.clone()
        }
    }

    /// True when the notification has no specific recipient.
    pub fn is_broadcast(&self) -> bool {
        self.user_id.is_none()
    }

    /// Whether `user`, holding `role`, may read (and mark) this notification.
    pub fn is_visible_to(&self, user: &UserId, role: Role) -> bool {
        match &self.user_id {
            Some(owner) => owner == user,
            None => role.receives_broadcasts(),
        }
    }

    /// Flags the notification as read. Idempotent.
    pub fn mark_read(&mut self) {
        self.is_read = true;
    }
}

/// Who a notification should be delivered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    /// Every teacher and student.
    Broadcast,
    /// The listed users, after audience filtering.
    Users(Vec<UserId>),
}

impl Recipients {
    /// Interprets an optional recipient list: absent or empty means broadcast.
    pub fn from_list(user_ids: Option<Vec<UserId>>) -> Self {
        match user_ids {
            Some(ids) if !ids.is_empty() => Recipients::Users(ids),
            _ => Recipients::Broadcast,
        }
    }
}
