//! Storage ports for the delivery core.
//!
//! The domain layer defines these traits; infrastructure provides the
//! implementations (dependency inversion). The UseCase layer depends only
//! on the traits, never on a concrete store.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use super::{
    entity::{Message, Notification, User},
    value_object::{MessageBody, UserId},
};

/// Errors surfaced by the storage collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The referenced user does not exist
    #[error("user {0} not found")]
    UserNotFound(i64),

    /// The referenced notification does not exist
    #[error("notification {0} not found")]
    NotificationNotFound(i64),

    /// The storage backend is unavailable or failed mid-operation
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Identity resolution port.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Resolve a user id to a full user record.
    async fn resolve_user(&self, id: UserId) -> Result<User, RepositoryError>;

    /// Create a new user (admin/seeding surface; authentication itself is
    /// an external concern).
    async fn create_user(&self, username: String) -> Result<User, RepositoryError>;
}

/// Message persistence port.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a direct message, assigning its id.
    ///
    /// The receiver must already have been resolved; the store still
    /// enforces existence of both parties.
    async fn create_message(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        body: MessageBody,
    ) -> Result<Message, RepositoryError>;
}

/// Notification persistence port.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// All unseen notifications for a user, in creation order.
    async fn unseen_notifications(&self, user_id: UserId)
    -> Result<Vec<Notification>, RepositoryError>;

    /// Live count of a user's unseen notifications.
    async fn count_unseen(&self, user_id: UserId) -> Result<u64, RepositoryError>;

    /// Flip one notification to the seen state.
    async fn mark_seen(&self, notification_id: i64) -> Result<(), RepositoryError>;

    /// Record a new notification for a user (the injection point for
    /// external business events).
    async fn create_notification(
        &self,
        user_id: UserId,
        message: String,
    ) -> Result<Notification, RepositoryError>;
}
