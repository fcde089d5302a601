//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{create_notification, create_user, get_unseen_count, health_check};

// Re-export WebSocket handlers
pub use websocket::{chat_handler, notification_handler};
