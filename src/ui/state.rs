//! Server state and connection query types.

use serde::Deserialize;
use std::{sync::Arc, time::Duration};

use crate::domain::{ChannelLayer, MessageRepository, NotificationRepository, UserRepository};

/// Query parameters for WebSocket connection
///
/// The id of the already-authenticated principal; authentication itself is
/// an external concern, this server only resolves the identity. A missing
/// id means an anonymous connection attempt.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub user_id: Option<i64>,
}

/// Shared application state
pub struct AppState {
    /// Identity collaborator
    pub users: Arc<dyn UserRepository>,
    /// Message storage collaborator
    pub messages: Arc<dyn MessageRepository>,
    /// Notification storage collaborator
    pub notifications: Arc<dyn NotificationRepository>,
    /// Group-membership/broadcast primitive
    pub channel: Arc<dyn ChannelLayer>,
    /// Re-poll cadence for notification watch loops
    pub poll_interval: Duration,
}
