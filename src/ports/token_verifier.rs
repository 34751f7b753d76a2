//! Token verification port.
//!
//! Verifies the bearer tokens minted by the portal's login service and
//! extracts `{user id, role}`. Used by the HTTP middleware and, when
//! handshake verification is enabled, by the socket upgrade.
//!
//! # Contract
//!
//! Implementations must:
//! - Validate the token signature and expiry
//! - Return `AuthError::InvalidToken` for malformed/bad signature tokens
//! - Return `AuthError::TokenExpired` for expired tokens

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a raw token (without "Bearer " prefix).
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
