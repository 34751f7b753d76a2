//! In-memory user directory.
//!
//! Without a database there is no user table to ask, so the directory learns
//! roles from the identities it is shown and remembers the latest one.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Role, UserId};
use crate::ports::UserDirectory;

#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<UserId, Role>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = (UserId, Role)>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().collect()),
        }
    }

    pub async fn insert(&self, user_id: UserId, role: Role) {
        self.users.write().await.insert(user_id, role);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn roles_of(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, Role>, DomainError> {
        let users = self.users.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| users.get(id).map(|role| (id.clone(), *role)))
            .collect())
    }

    async fn record(&self, user_id: &UserId, role: Role) -> Result<(), DomainError> {
        self.insert(user_id.clone(), role).await;
        Ok(())
    }
}
