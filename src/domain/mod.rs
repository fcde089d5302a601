//! Domain layer for the delivery core.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod channel;
pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use channel::{ChannelLayer, ConnectionId};
pub use entity::{Message, Notification, User};
pub use error::ValueObjectError;
pub use repository::{MessageRepository, NotificationRepository, RepositoryError, UserRepository};
pub use value_object::{MessageBody, RoutingKey, Timestamp, UserId};
