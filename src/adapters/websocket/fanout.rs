//! Fan-out engine: turns notifications and domain updates into room emits.
//!
//! # Event Flow
//!
//! ```text
//! Mutation handler (post-commit)
//!          │
//!          ▼
//! ┌────────────────────┐
//! │   FanoutEngine     │
//! │  resolve targets   │──── presence, then user directory
//! └────────────────────┘
//!          │
//!          ▼
//! ┌────────────────────┐
//! │    RoomManager     │
//! │  emit to rooms     │
//! └────────────────────┘
//! ```
//!
//! Delivery is at-most-once. Nothing is queued for users who are offline.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{ConnectionId, Role, UserId};
use crate::domain::notification::{Notification, NotificationType, Recipients};
use crate::domain::realtime::{select_recipients, unique_ids, DomainUpdate, RoomAddress, UpdateTarget};
use crate::ports::{RealtimePublisher, UserDirectory};

use super::messages::{ServerEvent, UserLoginPayload, UserLogoutPayload};
use super::presence::PresenceRegistry;
use super::rooms::RoomManager;

pub struct FanoutEngine {
    rooms: Arc<RoomManager>,
    presence: Arc<PresenceRegistry>,
    directory: Arc<dyn UserDirectory>,
}

impl FanoutEngine {
    pub fn new(
        rooms: Arc<RoomManager>,
        presence: Arc<PresenceRegistry>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            rooms,
            presence,
            directory,
        }
    }

    /// Resolves roles from presence, falling back to the directory for ids
    /// that are not online. Directory failures leave those ids unresolved.
    async fn resolve_roles(&self, user_ids: &[UserId]) -> HashMap<UserId, Role> {
        let mut roles = self.presence.roles_of(user_ids).await;

        let offline: Vec<UserId> = user_ids
            .iter()
            .filter(|id| !roles.contains_key(*id))
            .cloned()
            .collect();
        if offline.is_empty() {
            return roles;
        }

        match self.directory.roles_of(&offline).await {
            Ok(found) => roles.extend(found),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    unresolved = offline.len(),
                    "Role lookup failed, dropping unresolved recipients"
                );
            }
        }
        roles
    }

    /// Tells every other connection that `payload.user_id` logged in.
    pub async fn announce_login(&self, origin: &ConnectionId, payload: UserLoginPayload) -> usize {
        self.rooms
            .emit_to_all_except(origin, Arc::new(ServerEvent::UserLogin(payload)))
            .await
    }

    /// Tells every remaining connection that `user_id` went offline.
    pub async fn announce_logout(&self, user_id: &UserId) -> usize {
        let event = ServerEvent::UserLogout(UserLogoutPayload {
            user_id: user_id.clone(),
        });
        self.rooms.emit_to_all(Arc::new(event)).await
    }

    /// Lets the directory answer for `user_id` after it goes offline.
    pub async fn remember(&self, user_id: &UserId, role: Role) {
        if let Err(err) = self.directory.record(user_id, role).await {
            tracing::warn!(user_id = %user_id, error = %err, "Failed to record identity in directory");
        }
    }
}

#[async_trait]
impl RealtimePublisher for FanoutEngine {
    async fn resolve_audience(&self, kind: NotificationType, requested: &[UserId]) -> Vec<UserId> {
        let unique = unique_ids(requested);
        let roles = self.resolve_roles(&unique).await;
        select_recipients(kind, &unique, &roles)
    }

    async fn dispatch_notification(
        &self,
        notification: &Notification,
        recipients: &Recipients,
    ) -> usize {
        let event = Arc::new(ServerEvent::NotificationCreated(notification.clone()));

        match recipients {
            Recipients::Broadcast => {
                self.rooms
                    .emit_to_rooms(&RoomAddress::broadcast_rooms(), event)
                    .await
            }
            Recipients::Users(requested) => {
                let selected = self.resolve_audience(notification.kind, requested).await;
                tracing::debug!(
                    notification_id = %notification.id,
                    requested = requested.len(),
                    selected = selected.len(),
                    "Targeted notification"
                );

                let mut delivered = 0;
                for user_id in &selected {
                    delivered += self
                        .rooms
                        .emit_to_room(&RoomAddress::personal(user_id), Arc::clone(&event))
                        .await;
                }
                delivered
            }
        }
    }

    async fn deliver_notification(&self, notification: &Notification) -> usize {
        let event = Arc::new(ServerEvent::NotificationCreated(notification.clone()));
        match &notification.user_id {
            Some(user_id) => {
                self.rooms
                    .emit_to_room(&RoomAddress::personal(user_id), event)
                    .await
            }
            None => {
                self.rooms
                    .emit_to_rooms(&RoomAddress::broadcast_rooms(), event)
                    .await
            }
        }
    }

    async fn publish_update(&self, update: DomainUpdate) -> usize {
        let name = update.event_name();
        let target = update.target();
        let event = Arc::new(ServerEvent::from(update));

        let delivered = match target {
            UpdateTarget::Everyone => self.rooms.emit_to_all(event).await,
            UpdateTarget::Room(room) => self.rooms.emit_to_room(&room, event).await,
        };

        tracing::debug!(event = name, delivered, "Published domain update");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserDirectory;
    use crate::domain::foundation::DomainError;
    use crate::domain::realtime::{ConnectionIdentity, PresenceEntry};
    use serde_json::json;

    use super::super::rooms::OutboundReceiver;

    struct FailingDirectory;

    #[async_trait]
    impl UserDirectory for FailingDirectory {
        async fn roles_of(
            &self,
            _user_ids: &[UserId],
        ) -> Result<HashMap<UserId, Role>, DomainError> {
            Err(DomainError::database("roles_of", "connection refused"))
        }
    }

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    struct Fixture {
        rooms: Arc<RoomManager>,
        presence: Arc<PresenceRegistry>,
        engine: FanoutEngine,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_directory(Arc::new(InMemoryUserDirectory::new()))
        }

        fn with_directory(directory: Arc<dyn UserDirectory>) -> Self {
            let rooms = Arc::new(RoomManager::default());
            let presence = Arc::new(PresenceRegistry::new());
            let engine = FanoutEngine::new(rooms.clone(), presence.clone(), directory);
            Self {
                rooms,
                presence,
                engine,
            }
        }

        async fn connect(&self, user: &str, role: Role) -> (ConnectionId, OutboundReceiver) {
            let id = ConnectionId::new();
            let rx = self.rooms.register(id).await;
            self.rooms
                .join_identity_rooms(id, &ConnectionIdentity::new(uid(user), role))
                .await;
            self.presence
                .upsert(uid(user), PresenceEntry::connected(id, role))
                .await;
            (id, rx)
        }
    }

    fn drain(rx: &mut OutboundReceiver) -> Vec<Arc<ServerEvent>> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn assignment_reaches_only_teacher_recipients() {
        let fx = Fixture::new();
        let (_, mut t1) = fx.connect("t1", Role::Teacher).await;
        let (_, mut t2) = fx.connect("t2", Role::Student).await;

        let notification =
            Notification::new(NotificationType::Assignment, "Proctor B12", None, None).unwrap();
        let delivered = fx
            .engine
            .dispatch_notification(&notification, &Recipients::Users(vec![uid("t1"), uid("t2")]))
            .await;

        assert_eq!(delivered, 1);
        assert_eq!(drain(&mut t1).len(), 1);
        assert!(drain(&mut t2).is_empty());
    }

    #[tokio::test]
    async fn broadcast_skips_admins() {
        let fx = Fixture::new();
        let (_, mut teacher) = fx.connect("t1", Role::Teacher).await;
        let (_, mut student) = fx.connect("s1", Role::Student).await;
        let (_, mut admin) = fx.connect("a1", Role::Admin).await;

        let notification =
            Notification::new(NotificationType::System, "Maintenance", None, None).unwrap();
        let delivered = fx
            .engine
            .dispatch_notification(&notification, &Recipients::Broadcast)
            .await;

        assert_eq!(delivered, 2);
        assert_eq!(drain(&mut teacher).len(), 1);
        assert_eq!(drain(&mut student).len(), 1);
        assert!(drain(&mut admin).is_empty());
    }

    #[tokio::test]
    async fn duplicate_recipients_receive_one_copy() {
        let fx = Fixture::new();
        let (_, mut s1) = fx.connect("s1", Role::Student).await;

        let notification =
            Notification::new(NotificationType::Reminder, "Tomorrow 9am", None, None).unwrap();
        fx.engine
            .dispatch_notification(&notification, &Recipients::Users(vec![uid("s1"), uid("s1")]))
            .await;

        assert_eq!(drain(&mut s1).len(), 1);
    }

    #[tokio::test]
    async fn offline_recipients_are_resolved_through_directory() {
        let directory = InMemoryUserDirectory::new();
        directory.insert(uid("t9"), Role::Teacher).await;
        directory.insert(uid("s9"), Role::Student).await;
        let fx = Fixture::with_directory(Arc::new(directory));

        let audience = fx
            .engine
            .resolve_audience(NotificationType::Assignment, &[uid("t9"), uid("s9"), uid("x")])
            .await;

        assert_eq!(audience, vec![uid("t9")]);
    }

    #[tokio::test]
    async fn remembered_identity_is_resolved_after_going_offline() {
        let fx = Fixture::new();
        fx.engine.remember(&uid("t1"), Role::Teacher).await;

        let audience = fx
            .engine
            .resolve_audience(NotificationType::Assignment, &[uid("t1")])
            .await;

        assert_eq!(audience, vec![uid("t1")]);
    }

    #[tokio::test]
    async fn directory_failure_keeps_online_recipients() {
        let fx = Fixture::with_directory(Arc::new(FailingDirectory));
        let (_, _rx) = fx.connect("s1", Role::Student).await;

        let audience = fx
            .engine
            .resolve_audience(NotificationType::Result, &[uid("s1"), uid("s2")])
            .await;

        assert_eq!(audience, vec![uid("s1")]);
    }

    #[tokio::test]
    async fn deliver_addressed_notification_goes_to_personal_room() {
        let fx = Fixture::new();
        let (_, mut s1) = fx.connect("s1", Role::Student).await;
        let (_, mut s2) = fx.connect("s2", Role::Student).await;

        let notification = Notification::new(NotificationType::Result, "Graded", None, None)
            .unwrap()
            .addressed_to(uid("s1"));

        assert_eq!(fx.engine.deliver_notification(&notification).await, 1);
        assert_eq!(drain(&mut s1).len(), 1);
        assert!(drain(&mut s2).is_empty());
    }

    #[tokio::test]
    async fn exam_updates_reach_every_role() {
        let fx = Fixture::new();
        let (_, mut admin) = fx.connect("a1", Role::Admin).await;
        let (_, mut student) = fx.connect("s1", Role::Student).await;

        let delivered = fx
            .engine
            .publish_update(DomainUpdate::ExamRegistrationCountUpdated {
                exam_id: "e42".to_string(),
                new_count: 7,
            })
            .await;

        assert_eq!(delivered, 2);
        assert_eq!(drain(&mut admin)[0].name(), "exam-registration-count-updated");
        assert_eq!(drain(&mut student).len(), 1);
    }

    #[tokio::test]
    async fn schedule_updates_reach_admins_only() {
        let fx = Fixture::new();
        let (_, mut admin) = fx.connect("a1", Role::Admin).await;
        let (_, mut teacher) = fx.connect("t1", Role::Teacher).await;

        fx.engine
            .publish_update(DomainUpdate::ScheduleUpdated(json!({"examId": "e1"})))
            .await;

        assert_eq!(drain(&mut admin).len(), 1);
        assert!(drain(&mut teacher).is_empty());
    }

    #[tokio::test]
    async fn login_announcement_skips_sender() {
        let fx = Fixture::new();
        let (origin, mut sender) = fx.connect("s1", Role::Student).await;
        let (_, mut other) = fx.connect("t1", Role::Teacher).await;

        let delivered = fx
            .engine
            .announce_login(
                &origin,
                UserLoginPayload {
                    user_id: uid("s1"),
                    role: Role::Student,
                    username: None,
                    full_name: None,
                },
            )
            .await;

        assert_eq!(delivered, 1);
        assert!(drain(&mut sender).is_empty());
        assert_eq!(drain(&mut other)[0].name(), "user-login");
    }
}
