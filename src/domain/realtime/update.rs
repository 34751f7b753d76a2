//! Domain update events mirrored to connected clients.
//!
//! Mutation handlers raise one of these after their database commit. The
//! update decides its own audience; the payload is the updated resource as
//! the owning service serialized it, or a minimal delta.

use serde_json::Value;

use crate::domain::foundation::{NotificationId, Role, UserId};

use super::room::RoomAddress;

/// Where an update is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateTarget {
    /// Every connected client, whatever its role.
    Everyone,
    /// Members of one room.
    Room(RoomAddress),
}

/// A state change worth pushing to clients.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainUpdate {
    ExamCreated(Value),
    ExamUpdated(Value),
    ExamDeleted { id: String, name: String },
    ExamRegistrationCountUpdated { exam_id: String, new_count: u32 },
    ScheduleUpdated(Value),
    RegistrationUpdated { student_id: UserId, registration: Value },
    AssignmentCreated { teacher_id: UserId, assignment: Value },
    AssignmentStatusUpdated(Value),
    NotificationRead { user_id: UserId, notification_id: NotificationId },
}

impl DomainUpdate {
    /// Client-facing event name.
    pub fn event_name(&self) -> &'static str {
        match self {
            DomainUpdate::ExamCreated(_) => "exam-created",
            DomainUpdate::ExamUpdated(_) => "exam-updated",
            DomainUpdate::ExamDeleted { .. } => "exam-deleted",
            DomainUpdate::ExamRegistrationCountUpdated { .. } => "exam-registration-count-updated",
            DomainUpdate::ScheduleUpdated(_) => "schedule-updated",
            DomainUpdate::RegistrationUpdated { .. } => "registration-updated",
            DomainUpdate::AssignmentCreated { .. } => "assignment-created",
            DomainUpdate::AssignmentStatusUpdated(_) => "assignment-status-updated",
            DomainUpdate::NotificationRead { .. } => "notification-read",
        }
    }

    /// Audience of the update.
    ///
    /// Exam listing changes concern every role. Schedules and assignment
    /// replies are admin business. Registration and assignment offers, and
    /// read receipts, go to the one user they are about.
    pub fn target(&self) -> UpdateTarget {
        match self {
            DomainUpdate::ExamCreated(_)
            | DomainUpdate::ExamUpdated(_)
            | DomainUpdate::ExamDeleted { .. }
            | DomainUpdate::ExamRegistrationCountUpdated { .. } => UpdateTarget::Everyone,
            DomainUpdate::ScheduleUpdated(_) | DomainUpdate::AssignmentStatusUpdated(_) => {
                UpdateTarget::Room(RoomAddress::Role(Role::Admin))
            }
            DomainUpdate::RegistrationUpdated { student_id, .. } => {
                UpdateTarget::Room(RoomAddress::personal(student_id))
            }
            DomainUpdate::AssignmentCreated { teacher_id, .. } => {
                UpdateTarget::Room(RoomAddress::personal(teacher_id))
            }
            DomainUpdate::NotificationRead { user_id, .. } => {
                UpdateTarget::Room(RoomAddress::personal(user_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exam_listing_changes_go_to_everyone() {
        let updates = [
            DomainUpdate::ExamCreated(json!({"id": "e1"})),
            DomainUpdate::ExamUpdated(json!({"id": "e1"})),
            DomainUpdate::ExamDeleted {
                id: "e1".to_string(),
                name: "Algebra".to_string(),
            },
            DomainUpdate::ExamRegistrationCountUpdated {
                exam_id: "e42".to_string(),
                new_count: 7,
            },
        ];

        for update in updates {
            assert_eq!(update.target(), UpdateTarget::Everyone, "{}", update.event_name());
        }
    }

    #[test]
    fn schedule_updates_are_admin_only() {
        let update = DomainUpdate::ScheduleUpdated(json!({"examId": "e1", "room": "B12"}));
        assert_eq!(update.target(), UpdateTarget::Room(RoomAddress::Role(Role::Admin)));
        assert_eq!(update.event_name(), "schedule-updated");
    }

    #[test]
    fn registration_update_targets_the_student() {
        let student = UserId::new("s9").unwrap();
        let update = DomainUpdate::RegistrationUpdated {
            student_id: student.clone(),
            registration: json!({"status": "approved"}),
        };
        assert_eq!(update.target(), UpdateTarget::Room(RoomAddress::Personal(student)));
    }

    #[test]
    fn notification_read_targets_the_reader() {
        let user = UserId::new("t3").unwrap();
        let update = DomainUpdate::NotificationRead {
            user_id: user.clone(),
            notification_id: NotificationId::new(),
        };
        assert_eq!(update.target(), UpdateTarget::Room(RoomAddress::Personal(user)));
        assert_eq!(update.event_name(), "notification-read");
    }
}
