//! RealtimePublisher port - the contract mutation handlers call into.
//!
//! Every handler that changes exam, registration, schedule, assignment or
//! notification state calls exactly one of these methods after its commit.
//! Delivery is at-most-once: nothing is queued for offline users and no
//! error is ever reported back, only how many connections were reached.
//!
//! # Example
//!
//! ```ignore
//! async fn delete_exam(repo: &dyn ExamRepository, publisher: &dyn RealtimePublisher, id: &str) {
//!     let exam = repo.delete(id).await?;
//!     publisher
//!         .publish_update(DomainUpdate::ExamDeleted { id: exam.id, name: exam.name })
//!         .await;
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::notification::{Notification, NotificationType, Recipients};
use crate::domain::realtime::DomainUpdate;

#[async_trait]
pub trait RealtimePublisher: Send + Sync {
    /// Filters `requested` down to the users a `kind` notification may reach.
    async fn resolve_audience(&self, kind: NotificationType, requested: &[UserId]) -> Vec<UserId>;

    /// Runs the full targeting algorithm for `notification`.
    ///
    /// Returns the number of connections the event was handed to.
    async fn dispatch_notification(
        &self,
        notification: &Notification,
        recipients: &Recipients,
    ) -> usize;

    /// Delivers an already-addressed notification: to its owner's room, or
    /// to the teacher and student rooms when it is a broadcast row.
    async fn deliver_notification(&self, notification: &Notification) -> usize;

    /// Pushes a domain update to its audience.
    async fn publish_update(&self, update: DomainUpdate) -> usize;
}
