//! InMemory storage implementation.
//!
//! Concrete implementation of the storage ports defined by the domain
//! layer, backed by mutex-guarded collections with auto-increment ids.
//! Swapping in a DBMS-backed store later only requires implementing the
//! same traits; the UseCase layer never sees this type directly.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        Message, MessageBody, MessageRepository, Notification, NotificationRepository,
        RepositoryError, Timestamp, User, UserId, UserRepository,
    },
    time::current_timestamp,
};

#[derive(Debug, Default)]
struct StoreInner {
    users: HashMap<i64, User>,
    messages: Vec<Message>,
    notifications: Vec<Notification>,
    next_user_id: i64,
    next_message_id: i64,
    next_notification_id: i64,
}

/// In-memory store implementing every storage port.
///
/// One instance backs the whole server; all synchronization is internal,
/// so sessions share it behind plain `Arc` clones.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All persisted messages, in insertion order (test/debug accessor).
    pub async fn messages(&self) -> Vec<Message> {
        let inner = self.inner.lock().await;
        inner.messages.clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn resolve_user(&self, id: UserId) -> Result<User, RepositoryError> {
        let inner = self.inner.lock().await;
        inner
            .users
            .get(&id.value())
            .cloned()
            .ok_or(RepositoryError::UserNotFound(id.value()))
    }

    async fn create_user(&self, username: String) -> Result<User, RepositoryError> {
        let mut inner = self.inner.lock().await;
        inner.next_user_id += 1;
        let id = UserId::new(inner.next_user_id)
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        let user = User { id, username };
        inner.users.insert(id.value(), user.clone());
        Ok(user)
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn create_message(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        body: MessageBody,
    ) -> Result<Message, RepositoryError> {
        let mut inner = self.inner.lock().await;

        // Foreign-key style integrity: both parties must exist.
        if !inner.users.contains_key(&sender_id.value()) {
            return Err(RepositoryError::UserNotFound(sender_id.value()));
        }
        if !inner.users.contains_key(&receiver_id.value()) {
            return Err(RepositoryError::UserNotFound(receiver_id.value()));
        }

        inner.next_message_id += 1;
        let message = Message {
            id: inner.next_message_id,
            sender_id,
            receiver_id,
            body,
            sent_at: Timestamp::new(current_timestamp()),
        };
        inner.messages.push(message.clone());
        Ok(message)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn unseen_notifications(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.seen)
            .cloned()
            .collect())
    }

    async fn count_unseen(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.seen)
            .count() as u64)
    }

    async fn mark_seen(&self, notification_id: i64) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().await;
        let notification = inner
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
            .ok_or(RepositoryError::NotificationNotFound(notification_id))?;
        notification.mark_seen();
        Ok(())
    }

    async fn create_notification(
        &self,
        user_id: UserId,
        message: String,
    ) -> Result<Notification, RepositoryError> {
        let mut inner = self.inner.lock().await;
        if !inner.users.contains_key(&user_id.value()) {
            return Err(RepositoryError::UserNotFound(user_id.value()));
        }

        inner.next_notification_id += 1;
        let notification = Notification {
            id: inner.next_notification_id,
            user_id,
            message,
            created_at: Timestamp::new(current_timestamp()),
            seen: false,
        };
        inner.notifications.push(notification.clone());
        Ok(notification)
    }
}
