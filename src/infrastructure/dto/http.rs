//! HTTP API request/response DTOs for the admin surface.

use serde::{Deserialize, Serialize};

/// Request body for user creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}

/// Created/resolved user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
}

/// Request body for notification injection (external business event)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotificationRequest {
    pub message: String,
}

/// Created notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDetailDto {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub created_at: i64,
    pub seen: bool,
}

/// Debug read of a user's live unseen count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnseenCountDto {
    pub user_id: i64,
    pub unseen_count: u64,
}
