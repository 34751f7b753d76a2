//! Socket frame protocol.
//!
//! Every frame is a JSON text message `{"event": "<name>", "data": {...}}`:
//! - Server → Client: notifications, exam/registration/schedule/assignment
//!   updates, presence announcements, pong
//! - Client → Server: room re-affirmation, login announcement, client-side
//!   notification trigger, ping

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{NotificationId, Role, UserId};
use crate::domain::notification::{Notification, NotificationType};
use crate::domain::realtime::{DomainUpdate, ProfileUpdate};

// ============================================
// Server → Client Messages
// ============================================

/// All events the server pushes to connected clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    NotificationCreated(Notification),
    NotificationRead(NotificationReadPayload),
    ExamCreated(Value),
    ExamUpdated(Value),
    ExamDeleted(ExamDeletedPayload),
    ExamRegistrationCountUpdated(RegistrationCountPayload),
    ScheduleUpdated(Value),
    RegistrationUpdated(Value),
    AssignmentCreated(Value),
    AssignmentStatusUpdated(Value),
    UserLogin(UserLoginPayload),
    UserLogout(UserLogoutPayload),
    /// Heartbeat response.
    Pong,
}

impl ServerEvent {
    /// The wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::NotificationCreated(_) => "notification-created",
            ServerEvent::NotificationRead(_) => "notification-read",
            ServerEvent::ExamCreated(_) => "exam-created",
            ServerEvent::ExamUpdated(_) => "exam-updated",
            ServerEvent::ExamDeleted(_) => "exam-deleted",
            ServerEvent::ExamRegistrationCountUpdated(_) => "exam-registration-count-updated",
            ServerEvent::ScheduleUpdated(_) => "schedule-updated",
            ServerEvent::RegistrationUpdated(_) => "registration-updated",
            ServerEvent::AssignmentCreated(_) => "assignment-created",
            ServerEvent::AssignmentStatusUpdated(_) => "assignment-status-updated",
            ServerEvent::UserLogin(_) => "user-login",
            ServerEvent::UserLogout(_) => "user-logout",
            ServerEvent::Pong => "pong",
        }
    }

    /// Serializes the event into a text frame.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReadPayload {
    pub id: NotificationId,
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamDeletedPayload {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationCountPayload {
    pub exam_id: String,
    pub new_count: u32,
}

/// Login announcement, both as received from the client and as re-broadcast
/// to everyone else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLoginPayload {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl UserLoginPayload {
    pub fn profile(&self) -> ProfileUpdate {
        ProfileUpdate {
            username: self.username.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLogoutPayload {
    #[serde(rename = "userId")]
    pub user_id: UserId,
}

impl From<DomainUpdate> for ServerEvent {
    fn from(update: DomainUpdate) -> Self {
        match update {
            DomainUpdate::ExamCreated(exam) => ServerEvent::ExamCreated(exam),
            DomainUpdate::ExamUpdated(exam) => ServerEvent::ExamUpdated(exam),
            DomainUpdate::ExamDeleted { id, name } => {
                ServerEvent::ExamDeleted(ExamDeletedPayload { id, name })
            }
            DomainUpdate::ExamRegistrationCountUpdated { exam_id, new_count } => {
                ServerEvent::ExamRegistrationCountUpdated(RegistrationCountPayload {
                    exam_id,
                    new_count,
                })
            }
            DomainUpdate::ScheduleUpdated(schedule) => ServerEvent::ScheduleUpdated(schedule),
            DomainUpdate::RegistrationUpdated { registration, .. } => {
                ServerEvent::RegistrationUpdated(registration)
            }
            DomainUpdate::AssignmentCreated { assignment, .. } => {
                ServerEvent::AssignmentCreated(assignment)
            }
            DomainUpdate::AssignmentStatusUpdated(assignment) => {
                ServerEvent::AssignmentStatusUpdated(assignment)
            }
            DomainUpdate::NotificationRead {
                user_id,
                notification_id,
            } => ServerEvent::NotificationRead(NotificationReadPayload {
                id: notification_id,
                user_id,
            }),
        }
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// All events a client may send.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Re-affirm membership of the identity rooms.
    JoinRoom(RoomClaim),

    /// Profile announcement after the page finished logging in.
    UserLogin(UserLoginPayload),

    /// Client-side notification trigger; re-targeted server side.
    NotificationCreated(NotificationRequest),

    /// Heartbeat request.
    Ping,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoomClaim {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotificationRequest {
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub content: String,
    #[serde(default)]
    pub exam_id: Option<String>,
    #[serde(default)]
    pub user_ids: Option<Vec<UserId>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    #[test]
    fn registration_count_uses_camel_case_payload() {
        let event = ServerEvent::from(DomainUpdate::ExamRegistrationCountUpdated {
            exam_id: "e42".to_string(),
            new_count: 7,
        });

        let frame: Value = serde_json::from_str(&event.to_frame().unwrap()).unwrap();
        assert_eq!(
            frame,
            json!({"event": "exam-registration-count-updated", "data": {"examId": "e42", "newCount": 7}})
        );
    }

    #[test]
    fn exam_deleted_carries_id_and_name() {
        let event = ServerEvent::from(DomainUpdate::ExamDeleted {
            id: "e1".to_string(),
            name: "Algebra".to_string(),
        });

        let frame = serde_json::to_value(&event).unwrap();
        assert_eq!(frame["event"], "exam-deleted");
        assert_eq!(frame["data"], json!({"id": "e1", "name": "Algebra"}));
    }

    #[test]
    fn notification_created_serializes_entity_as_is() {
        let notification =
            Notification::new(NotificationType::System, "Maintenance", None, None).unwrap();
        let frame = serde_json::to_value(ServerEvent::NotificationCreated(notification)).unwrap();

        assert_eq!(frame["event"], "notification-created");
        assert_eq!(frame["data"]["type"], "system");
        assert_eq!(frame["data"]["content"], "Maintenance");
        assert_eq!(frame["data"]["user_id"], Value::Null);
        assert_eq!(frame["data"]["is_read"], false);
    }

    #[test]
    fn user_logout_uses_user_id_key() {
        let frame = serde_json::to_value(ServerEvent::UserLogout(UserLogoutPayload {
            user_id: uid("s1"),
        }))
        .unwrap();
        assert_eq!(frame, json!({"event": "user-logout", "data": {"userId": "s1"}}));
    }

    #[test]
    fn user_login_omits_absent_profile_fields() {
        let frame = serde_json::to_value(ServerEvent::UserLogin(UserLoginPayload {
            user_id: uid("t1"),
            role: Role::Teacher,
            username: Some("tkim".to_string()),
            full_name: None,
        }))
        .unwrap();
        assert_eq!(
            frame["data"],
            json!({"userId": "t1", "role": "teacher", "username": "tkim"})
        );
    }

    #[test]
    fn pong_has_no_data() {
        let frame = serde_json::to_value(ServerEvent::Pong).unwrap();
        assert_eq!(frame, json!({"event": "pong"}));
    }

    #[test]
    fn parses_join_room() {
        let event: ClientEvent = serde_json::from_value(
            json!({"event": "join-room", "data": {"userId": "s1", "role": "student"}}),
        )
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::JoinRoom(RoomClaim {
                user_id: uid("s1"),
                role: Role::Student
            })
        );
    }

    #[test]
    fn parses_notification_trigger_without_recipients() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "notification-created",
            "data": {"type": "reminder", "content": "Exam tomorrow"}
        }))
        .unwrap();

        match event {
            ClientEvent::NotificationCreated(request) => {
                assert_eq!(request.kind, NotificationType::Reminder);
                assert_eq!(request.user_ids, None);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn parses_ping() {
        let event: ClientEvent = serde_json::from_str(r#"{"event":"ping"}"#).unwrap();
        assert_eq!(event, ClientEvent::Ping);
    }

    #[test]
    fn rejects_unknown_role_in_join_room() {
        let result: Result<ClientEvent, _> = serde_json::from_value(
            json!({"event": "join-room", "data": {"userId": "s1", "role": "guest"}}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_event() {
        let result: Result<ClientEvent, _> =
            serde_json::from_value(json!({"event": "request-state"}));
        assert!(result.is_err());
    }
}
