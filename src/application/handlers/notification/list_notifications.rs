//! ListNotificationsHandler - Query handler for "my notifications".
//!
//! The pull-based read a reconnecting client uses to catch up on anything
//! pushed while it was offline.

use std::sync::Arc;

use crate::domain::foundation::{Role, UserId};
use crate::domain::notification::{Notification, NotificationError};
use crate::ports::NotificationRepository;

pub const DEFAULT_LIST_LIMIT: u32 = 50;
pub const MAX_LIST_LIMIT: u32 = 200;

#[derive(Debug, Clone)]
pub struct ListNotificationsQuery {
    pub user_id: UserId,
    pub role: Role,
    pub limit: Option<u32>,
}

pub struct ListNotificationsHandler {
    repository: Arc<dyn NotificationRepository>,
}

impl ListNotificationsHandler {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: ListNotificationsQuery,
    ) -> Result<Vec<Notification>, NotificationError> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);

        Ok(self
            .repository
            .list_for_user(&query.user_id, query.role, limit)
            .await?)
    }
}
