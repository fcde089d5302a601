//! UseCase: notification queries, seen-state transitions, and the
//! per-connection polling loop.
//!
//! `watch_new` is the one unbounded operation here: it is meant to be
//! spawned as a background task owned by the notification session and
//! aborted at disconnect, never awaited to completion.

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    domain::{NotificationRepository, RepositoryError, UserId},
    infrastructure::dto::websocket::{
        NotificationAction, NotificationCountEvent, NotificationDto, NotificationEvent,
    },
};

/// How long the polling loop sleeps between unseen-notification queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(20);

/// Notification delivery use case.
#[derive(Clone)]
pub struct NotificationUseCase {
    /// Storage collaborator (notification records)
    notifications: Arc<dyn NotificationRepository>,
    /// Re-poll cadence of [`NotificationUseCase::watch_new`]
    poll_interval: Duration,
}

impl NotificationUseCase {
    /// Create a new NotificationUseCase with the default poll cadence.
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self::with_poll_interval(notifications, DEFAULT_POLL_INTERVAL)
    }

    /// Create a new NotificationUseCase with an explicit poll cadence.
    pub fn with_poll_interval(
        notifications: Arc<dyn NotificationRepository>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            notifications,
            poll_interval,
        }
    }

    /// Live count of a user's unseen notifications. Pure read.
    pub async fn count_unseen(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        self.notifications.count_unseen(user_id).await
    }

    /// Flip every currently-unseen notification of the user to seen.
    ///
    /// Not one atomic transaction: notifications are flipped one at a time,
    /// and one created after the load began stays unseen. Absent concurrent
    /// creation this converges to a zero unseen count.
    pub async fn mark_all_seen(&self, user_id: UserId) -> Result<(), RepositoryError> {
        let unseen = self.notifications.unseen_notifications(user_id).await?;
        for notification in unseen {
            self.notifications.mark_seen(notification.id).await?;
        }
        Ok(())
    }

    /// Emit every pending (unseen) notification in load order, then one
    /// trailing count event.
    ///
    /// The trailing count is a fresh read taken after the batch; a
    /// notification created between load and that read may or may not be
    /// reflected. That race is accepted behavior, not a bug.
    pub async fn send_pending(
        &self,
        user_id: UserId,
        out: &UnboundedSender<String>,
    ) -> Result<(), RepositoryError> {
        let pending = self.notifications.unseen_notifications(user_id).await?;
        for notification in &pending {
            let event = NotificationEvent {
                action: NotificationAction::PreviousNotification,
                notification: NotificationDto::from(notification),
            };
            if out.send(serde_json::to_string(&event).unwrap()).is_err() {
                // Connection already torn down; nothing left to report to.
                return Ok(());
            }
        }

        self.send_count(user_id, out).await
    }

    /// Emit a single event carrying the current unseen count.
    pub async fn send_count(
        &self,
        user_id: UserId,
        out: &UnboundedSender<String>,
    ) -> Result<(), RepositoryError> {
        let count = self.notifications.count_unseen(user_id).await?;
        let event = NotificationCountEvent {
            notification_count: count,
        };
        if out.send(serde_json::to_string(&event).unwrap()).is_err() {
            // Connection already torn down; nothing left to report to.
            return Ok(());
        }
        Ok(())
    }

    /// Polling loop: re-query unseen notifications each cycle, emit one
    /// `new_notification` event per record, then sleep the poll interval.
    ///
    /// Never marks anything seen; seen-state transitions happen only via
    /// explicit client action. Query failures are transient: they are
    /// logged and the loop keeps going, with the sleep as natural backoff.
    /// The loop has no exit condition of its own; the owning session
    /// aborts the task at disconnect. A closed outbound channel also ends
    /// it, since the connection is then already gone.
    pub async fn watch_new(&self, user_id: UserId, out: UnboundedSender<String>) {
        loop {
            match self.notifications.unseen_notifications(user_id).await {
                Ok(new_notifications) => {
                    for notification in &new_notifications {
                        let event = NotificationEvent {
                            action: NotificationAction::NewNotification,
                            notification: NotificationDto::from(notification),
                        };
                        if out.send(serde_json::to_string(&event).unwrap()).is_err() {
                            return;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Notification poll for user '{}' failed, retrying next cycle: {}",
                        user_id,
                        e
                    );
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
