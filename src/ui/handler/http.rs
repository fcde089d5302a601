//! HTTP API endpoint handlers.
//!
//! The admin surface doubles as the seam for the out-of-scope
//! collaborators: user creation stands in for the identity layer, and
//! notification injection stands in for the business events that create
//! notification records.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{RepositoryError, UserId},
    infrastructure::dto::http::{
        CreateNotificationRequest, CreateUserRequest, NotificationDetailDto, UnseenCountDto,
        UserDto,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create a user
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), StatusCode> {
    let user = state
        .users
        .create_user(request.username)
        .await
        .map_err(internal_error)?;

    Ok((
        StatusCode::CREATED,
        Json(UserDto {
            id: user.id.value(),
            username: user.username,
        }),
    ))
}

/// Inject a notification for a user
pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<NotificationDetailDto>), StatusCode> {
    let user_id = UserId::new(user_id).map_err(|_| StatusCode::NOT_FOUND)?;
    let notification = state
        .notifications
        .create_notification(user_id, request.message)
        .await
        .map_err(not_found_or_internal)?;

    Ok((
        StatusCode::CREATED,
        Json(NotificationDetailDto {
            id: notification.id,
            user_id: notification.user_id.value(),
            message: notification.message,
            created_at: notification.created_at.value(),
            seen: notification.seen,
        }),
    ))
}

/// Debug endpoint: live unseen count for a user
pub async fn get_unseen_count(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<UnseenCountDto>, StatusCode> {
    let user_id = UserId::new(user_id).map_err(|_| StatusCode::NOT_FOUND)?;
    let unseen_count = state
        .notifications
        .count_unseen(user_id)
        .await
        .map_err(not_found_or_internal)?;

    Ok(Json(UnseenCountDto {
        user_id: user_id.value(),
        unseen_count,
    }))
}

fn internal_error(e: RepositoryError) -> StatusCode {
    tracing::error!("Storage failure on admin endpoint: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

fn not_found_or_internal(e: RepositoryError) -> StatusCode {
    match e {
        RepositoryError::UserNotFound(_) => StatusCode::NOT_FOUND,
        other => internal_error(other),
    }
}
