//! PostgreSQL implementation of UserDirectory, reading the portal's
//! `users (id TEXT PRIMARY KEY, role TEXT NOT NULL, ...)` table.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, Role, UserId};
use crate::ports::UserDirectory;

pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRoleRow {
    id: String,
    role: String,
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn roles_of(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, Role>, DomainError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<String> = user_ids.iter().map(|id| id.as_str().to_string()).collect();
        let rows: Vec<UserRoleRow> = sqlx::query_as(
            r#"
            SELECT id, role
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to look up user roles", e))?;

        let mut roles = HashMap::with_capacity(rows.len());
        for row in rows {
            match (UserId::new(row.id.as_str()), row.role.parse::<Role>()) {
                (Ok(id), Ok(role)) => {
                    roles.insert(id, role);
                }
                _ => {
                    tracing::warn!(user_id = %row.id, role = %row.role, "Skipping user with unusable role");
                }
            }
        }
        Ok(roles)
    }
}
