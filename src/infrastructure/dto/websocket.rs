//! WebSocket frame DTOs for the chat and notification sockets.
//!
//! Inbound frames are internally-tagged enums over a closed set of command
//! kinds; an unknown discriminator fails deserialization and the handler
//! ignores the frame (deliberate "ignore unknown commands" policy).

use serde::{Deserialize, Serialize};

use crate::domain::{Message, Notification};

/// Inbound command on the chat socket.
///
/// Wire shape: `{"type": "message", "message": {"receiver_id": 2, "text": "hi"}}`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatCommand {
    Message { message: IncomingMessage },
}

/// Payload of an inbound chat message, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub receiver_id: i64,
    pub text: String,
}

/// Inbound command on the notification socket.
///
/// Wire shape: `{"action": "mark_as_seen"}` etc.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NotificationCommand {
    MarkAsSeen,
    SeeNotification,
    SeeNotificationCount,
}

/// Discriminator for chat-socket outbound frames
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Message,
    Error,
}

/// Discriminator for notification-socket outbound frames
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAction {
    PreviousNotification,
    NewNotification,
}

/// Persisted message as delivered to routing groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub text: String,
    pub sent_at: i64,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id.value(),
            receiver_id: message.receiver_id.value(),
            text: message.body.as_str().to_string(),
            sent_at: message.sent_at.value(),
        }
    }
}

/// Notification as delivered on the notification socket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDto {
    pub id: i64,
    pub message: String,
    pub created: i64,
}

impl From<&Notification> for NotificationDto {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id,
            message: notification.message.clone(),
            created: notification.created_at.value(),
        }
    }
}

/// Chat message event broadcast to sender and receiver groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    pub r#type: EventType,
    pub message: MessageDto,
}

/// Failed-send report back to the sender; the connection stays open
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub r#type: EventType,
    pub detail: String,
}

/// One pending or new notification pushed to the notification socket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub action: NotificationAction,
    pub notification: NotificationDto,
}

/// Current unseen-notification count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCountEvent {
    pub notification_count: u64,
}
