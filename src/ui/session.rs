//! Per-connection sessions.
//!
//! A session binds one live socket to one authenticated user for its
//! lifetime. Sessions are only ever constructed for authenticated users;
//! an anonymous connection is closed before any session state exists.
//!
//! `close` is idempotent on both session kinds: the socket tasks, the
//! handler epilogue, and (for notifications) `Drop` may all race to call
//! it without double-discarding membership or leaking the watch task.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

use crate::{
    domain::{ChannelLayer, ConnectionId, RoutingKey, User},
    infrastructure::dto::websocket::{ChatCommand, ErrorEvent, EventType, NotificationCommand},
    usecase::{NotificationUseCase, SendMessageError, SendMessageUseCase},
};

/// A live chat connection bound to a user's routing group.
pub struct ChatSession {
    user: User,
    routing_key: RoutingKey,
    connection_id: ConnectionId,
    channel: Arc<dyn ChannelLayer>,
    registered: AtomicBool,
}

impl ChatSession {
    /// Open a session for an authenticated user: derive the routing key and
    /// register exactly one group membership for this connection.
    pub async fn open(
        user: User,
        channel: Arc<dyn ChannelLayer>,
        sender: UnboundedSender<String>,
    ) -> Self {
        let routing_key = RoutingKey::for_user(user.id);
        let connection_id = ConnectionId::generate();
        channel
            .group_add(routing_key.clone(), connection_id, sender)
            .await;
        tracing::info!("User '{}' joined group '{}'", user.id, routing_key);

        Self {
            user,
            routing_key,
            connection_id,
            channel,
            registered: AtomicBool::new(true),
        }
    }

    /// The authenticated user this session is bound to.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Handle one inbound frame.
    ///
    /// Unrecognized command types are ignored without surfacing an error to
    /// the peer. Failed sends are reported back on `out`; the connection
    /// stays open either way.
    pub async fn receive(
        &self,
        frame: &str,
        send_message: &SendMessageUseCase,
        out: &UnboundedSender<String>,
    ) {
        let command = match serde_json::from_str::<ChatCommand>(frame) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!(
                    "Ignoring unrecognized frame from user '{}': {}",
                    self.user.id,
                    e
                );
                return;
            }
        };

        match command {
            ChatCommand::Message { message } => {
                match send_message.execute(self.user.id, message).await {
                    Ok(persisted) => {
                        tracing::info!(
                            "Routed message {} from user '{}' to user '{}'",
                            persisted.id,
                            persisted.sender_id,
                            persisted.receiver_id
                        );
                    }
                    Err(e) => {
                        if let SendMessageError::Storage(ref detail) = e {
                            tracing::error!(
                                "Storage failure while routing message from user '{}': {}",
                                self.user.id,
                                detail
                            );
                        } else {
                            tracing::warn!("Rejected message from user '{}': {}", self.user.id, e);
                        }
                        let event = ErrorEvent {
                            r#type: EventType::Error,
                            detail: e.to_string(),
                        };
                        let _ = out.send(serde_json::to_string(&event).unwrap());
                    }
                }
            }
        }
    }

    /// Tear the session down, deregistering group membership.
    ///
    /// Safe to call more than once; only the first call discards.
    pub async fn close(&self) {
        if self.registered.swap(false, Ordering::SeqCst) {
            self.channel
                .group_discard(&self.routing_key, &self.connection_id)
                .await;
            tracing::info!("User '{}' left group '{}'", self.user.id, self.routing_key);
        }
    }
}

/// A live notification connection, owner of the polling watch task.
pub struct NotificationSession {
    user: User,
    notifications: NotificationUseCase,
    out: UnboundedSender<String>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationSession {
    /// Open a session and spawn the polling loop for its user.
    ///
    /// The watch task lives until [`NotificationSession::close`] aborts it;
    /// it is never left to exit on its own.
    pub fn open(user: User, notifications: NotificationUseCase, out: UnboundedSender<String>) -> Self {
        let watcher = tokio::spawn({
            let usecase = notifications.clone();
            let user_id = user.id;
            let out = out.clone();
            async move { usecase.watch_new(user_id, out).await }
        });
        tracing::info!("User '{}' connected to notifications", user.id);

        Self {
            user,
            notifications,
            out,
            watcher: Mutex::new(Some(watcher)),
        }
    }

    /// The authenticated user this session is bound to.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Whether the watch task is still alive (test/debug accessor).
    pub fn is_watching(&self) -> bool {
        self.watcher
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|w| !w.is_finished()))
            .unwrap_or(false)
    }

    /// Handle one inbound frame; unknown actions are ignored.
    ///
    /// Storage failures are logged and the session continues; a single
    /// failed command should not end an otherwise healthy connection.
    pub async fn receive(&self, frame: &str) {
        let command = match serde_json::from_str::<NotificationCommand>(frame) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!(
                    "Ignoring unrecognized frame from user '{}': {}",
                    self.user.id,
                    e
                );
                return;
            }
        };

        let result = match command {
            NotificationCommand::MarkAsSeen => {
                self.notifications.mark_all_seen(self.user.id).await
            }
            NotificationCommand::SeeNotification => {
                self.notifications.send_pending(self.user.id, &self.out).await
            }
            NotificationCommand::SeeNotificationCount => {
                self.notifications.send_count(self.user.id, &self.out).await
            }
        };

        if let Err(e) = result {
            tracing::error!(
                "Notification command failed for user '{}': {}",
                self.user.id,
                e
            );
        }
    }

    /// Tear the session down, aborting the watch task. Idempotent.
    pub fn close(&self) {
        if let Some(watcher) = self.watcher.lock().ok().and_then(|mut guard| guard.take()) {
            watcher.abort();
            tracing::info!("User '{}' disconnected from notifications", self.user.id);
        }
    }
}

impl Drop for NotificationSession {
    // Abnormal teardown must not leave an orphaned watch task behind.
    fn drop(&mut self) {
        self.close();
    }
}
