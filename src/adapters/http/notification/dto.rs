//! HTTP DTOs for notification endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;
use crate::domain::notification::{Notification, NotificationType};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/notifications`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotificationRequest {
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub content: String,
    #[serde(default)]
    pub exam_id: Option<String>,
    /// Absent or empty means broadcast.
    #[serde(default)]
    pub user_ids: Option<Vec<UserId>>,
}

/// Query string of `GET /api/notifications`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListNotificationsParams {
    #[serde(default)]
    pub limit: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct CreateNotificationResponse {
    pub notifications: Vec<Notification>,
    /// Connections the notification was pushed to.
    pub delivered: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub notification: Notification,
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_reads_type_and_optional_fields() {
        let request: CreateNotificationRequest =
            serde_json::from_value(json!({"type": "assignment", "content": "Proctor", "user_ids": ["t1"]}))
                .unwrap();

        assert_eq!(request.kind, NotificationType::Assignment);
        assert_eq!(request.exam_id, None);
        assert_eq!(request.user_ids.unwrap()[0].as_str(), "t1");
    }

    #[test]
    fn create_request_rejects_unknown_type() {
        let result: Result<CreateNotificationRequest, _> =
            serde_json::from_value(json!({"type": "gossip", "content": "x"}));
        assert!(result.is_err());
    }
}
