//! Notification-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | Forbidden | 403 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, NotificationId, Role, ValidationError};

/// Notification-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    /// Notification does not exist or is not addressed to the caller.
    #[error("Notification not found: {0}")]
    NotFound(NotificationId),

    /// Caller's role may not perform this operation.
    #[error("Role '{0}' is not allowed to perform this action")]
    Forbidden(Role),

    /// Request payload failed validation.
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Storage or other infrastructure failure.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl NotificationError {
    /// Stable error code for API responses.
    pub fn code(&self) -> ErrorCode {
        match self {
            NotificationError::NotFound(_) => ErrorCode::NotificationNotFound,
            NotificationError::Forbidden(_) => ErrorCode::Forbidden,
            NotificationError::ValidationFailed(_) => ErrorCode::ValidationFailed,
            NotificationError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for NotificationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => NotificationError::ValidationFailed(
                ValidationError::invalid_format("request", err.message),
            ),
            _ => NotificationError::Infrastructure(err.to_string()),
        }
    }
}
