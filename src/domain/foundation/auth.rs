//! Authentication types for the domain layer.
//!
//! These types represent a caller whose bearer token has been verified by
//! a `TokenVerifier` adapter. They carry no provider-specific data.

use super::{Role, UserId};
use thiserror::Error;

/// Authenticated caller extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The portal user id (`sub` claim).
    pub id: UserId,

    /// The portal role (`role` claim).
    pub role: Role,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// Token is valid but the caller lacks the role required for this action.
    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_user_new_creates_user() {
        let user = AuthenticatedUser::new(UserId::new("t1").unwrap(), Role::Teacher);

        assert_eq!(user.id.as_str(), "t1");
        assert_eq!(user.role, Role::Teacher);
    }

    #[test]
    fn auth_error_invalid_token_displays_correctly() {
        assert_eq!(format!("{}", AuthError::InvalidToken), "Invalid or expired token");
    }
}
