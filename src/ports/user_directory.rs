//! User directory port - role lookup for users who may be offline.
//!
//! The fan-out engine resolves recipient roles from presence first; ids
//! that are not online are looked up here.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Role, UserId};

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Roles of the given users. Unknown ids are simply absent from the map.
    async fn roles_of(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, Role>, DomainError>;

    /// Notes an identity seen on a connection or an authenticated request.
    ///
    /// Directories backed by the portal's own user table ignore this.
    async fn record(&self, _user_id: &UserId, _role: Role) -> Result<(), DomainError> {
        Ok(())
    }
}
