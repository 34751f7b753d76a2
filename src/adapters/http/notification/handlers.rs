//! HTTP handlers for notification endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::notification::{
    CreateNotificationCommand, CreateNotificationHandler, ListNotificationsHandler,
    ListNotificationsQuery, MarkNotificationReadCommand, MarkNotificationReadHandler,
};
use crate::domain::foundation::{NotificationId, ValidationError};
use crate::domain::notification::NotificationError;
use crate::ports::{NotificationRepository, RealtimePublisher};

use super::super::middleware::RequireAuth;
use super::dto::{
    CreateNotificationRequest, CreateNotificationResponse, ErrorResponse,
    ListNotificationsParams, NotificationListResponse, NotificationResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct NotificationAppState {
    pub repository: Arc<dyn NotificationRepository>,
    pub publisher: Arc<dyn RealtimePublisher>,
}

impl NotificationAppState {
    pub fn new(
        repository: Arc<dyn NotificationRepository>,
        publisher: Arc<dyn RealtimePublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    pub fn create_handler(&self) -> CreateNotificationHandler {
        CreateNotificationHandler::new(self.repository.clone(), self.publisher.clone())
    }

    pub fn list_handler(&self) -> ListNotificationsHandler {
        ListNotificationsHandler::new(self.repository.clone())
    }

    pub fn mark_read_handler(&self) -> MarkNotificationReadHandler {
        MarkNotificationReadHandler::new(self.repository.clone(), self.publisher.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/notifications - Create and push a notification (admin, teacher)
pub async fn create_notification(
    State(state): State<NotificationAppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<impl IntoResponse, NotificationApiError> {
    let cmd = CreateNotificationCommand {
        author: user,
        kind: request.kind,
        content: request.content,
        exam_id: request.exam_id,
        user_ids: request.user_ids,
    };

    let result = state.create_handler().handle(cmd).await?;

    let response = CreateNotificationResponse {
        notifications: result.notifications,
        delivered: result.delivered,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/notifications - The caller's notifications, newest first
pub async fn list_notifications(
    State(state): State<NotificationAppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ListNotificationsParams>,
) -> Result<impl IntoResponse, NotificationApiError> {
    let notifications = state
        .list_handler()
        .handle(ListNotificationsQuery {
            user_id: user.id,
            role: user.role,
            limit: params.limit,
        })
        .await?;

    Ok(Json(NotificationListResponse { notifications }))
}

/// PUT /api/notifications/:id/read - Mark one notification read
pub async fn mark_notification_read(
    State(state): State<NotificationAppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, NotificationApiError> {
    let notification_id: NotificationId = id.parse().map_err(|_| {
        NotificationError::ValidationFailed(ValidationError::invalid_format(
            "id",
            "must be a UUID",
        ))
    })?;

    let result = state
        .mark_read_handler()
        .handle(MarkNotificationReadCommand {
            user_id: user.id,
            role: user.role,
            notification_id,
        })
        .await?;

    Ok(Json(NotificationResponse {
        notification: result.notification,
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct NotificationApiError(NotificationError);

impl From<NotificationError> for NotificationApiError {
    fn from(err: NotificationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for NotificationApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            NotificationError::NotFound(_) => StatusCode::NOT_FOUND,
            NotificationError::Forbidden(_) => StatusCode::FORBIDDEN,
            NotificationError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            NotificationError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "Notification request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self.0 {
            NotificationError::Infrastructure(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        let body = ErrorResponse::new(self.0.code().to_string(), message);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Role;

    #[test]
    fn not_found_maps_to_404() {
        let response =
            NotificationApiError(NotificationError::NotFound(NotificationId::new())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn forbidden_maps_to_403() {
        let response = NotificationApiError(NotificationError::Forbidden(Role::Student)).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn validation_maps_to_400() {
        let response = NotificationApiError(NotificationError::ValidationFailed(
            ValidationError::empty_field("content"),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn infrastructure_maps_to_500() {
        let response =
            NotificationApiError(NotificationError::Infrastructure("db down".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
