//! Identity claims carried by the socket handshake.
//!
//! The handshake is `GET /socket?userId=<id>&role=<role>[&token=<jwt>]`.
//! The claim is trusted as-is unless handshake verification is switched on,
//! in which case the adapter layer checks it against the bearer token.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::foundation::{Role, UserId};

/// Raw handshake query parameters, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandshakeQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub role: Option<String>,
    pub token: Option<String>,
}

impl HandshakeQuery {
    /// Convenience constructor for a plain `{userId, role}` claim.
    pub fn claim(user_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            role: Some(role.into()),
            token: None,
        }
    }

    /// Attaches a bearer token to the claim.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Why a handshake was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("handshake is missing userId")]
    MissingUserId,

    #[error("handshake is missing role")]
    MissingRole,

    #[error("handshake role '{0}' is not recognized")]
    UnknownRole(String),

    #[error("handshake token is required")]
    MissingToken,

    #[error("handshake token rejected: {0}")]
    TokenRejected(String),

    #[error("handshake claim does not match token")]
    ClaimMismatch,
}

/// The validated `{userId, role}` of one connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionIdentity {
    pub user_id: UserId,
    pub role: Role,
}

impl ConnectionIdentity {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Validates a handshake claim.
    ///
    /// `userId` must be present and non-blank, `role` must be one of the
    /// three role tags. Nothing else is checked here.
    pub fn from_handshake(query: &HandshakeQuery) -> Result<Self, IdentityError> {
        let user_id = query
            .user_id
            .as_deref()
            .and_then(|raw| UserId::new(raw).ok())
            .ok_or(IdentityError::MissingUserId)?;

        let raw_role = query
            .role
            .as_deref()
            .filter(|r| !r.is_empty())
            .ok_or(IdentityError::MissingRole)?;

        let role = raw_role
            .parse::<Role>()
            .map_err(|_| IdentityError::UnknownRole(raw_role.to_string()))?;

        Ok(Self { user_id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_claim() {
        let identity =
            ConnectionIdentity::from_handshake(&HandshakeQuery::claim("s1", "student")).unwrap();

        assert_eq!(identity.user_id.as_str(), "s1");
        assert_eq!(identity.role, Role::Student);
    }

    #[test]
    fn rejects_missing_user_id() {
        let query = HandshakeQuery {
            role: Some("teacher".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ConnectionIdentity::from_handshake(&query),
            Err(IdentityError::MissingUserId)
        );
    }

    #[test]
    fn rejects_blank_user_id() {
        assert_eq!(
            ConnectionIdentity::from_handshake(&HandshakeQuery::claim("", "teacher")),
            Err(IdentityError::MissingUserId)
        );
    }

    #[test]
    fn rejects_missing_role() {
        let query = HandshakeQuery {
            user_id: Some("t1".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ConnectionIdentity::from_handshake(&query),
            Err(IdentityError::MissingRole)
        );
    }

    #[test]
    fn rejects_unknown_role() {
        assert_eq!(
            ConnectionIdentity::from_handshake(&HandshakeQuery::claim("u1", "guest")),
            Err(IdentityError::UnknownRole("guest".to_string()))
        );
    }

    #[test]
    fn handshake_query_reads_camel_case_user_id() {
        let query: HandshakeQuery =
            serde_json::from_value(serde_json::json!({"userId": "a1", "role": "admin"})).unwrap();
        assert_eq!(query.user_id.as_deref(), Some("a1"));
        assert_eq!(query.token, None);
    }
}
