//! Entities for the delivery domain.
//!
//! Entities have identity and a lifecycle. `Message` is immutable after
//! creation; `Notification` mutates only through its seen-state transition.

use serde::{Deserialize, Serialize};

use super::value_object::{MessageBody, Timestamp, UserId};

/// An authenticated user.
///
/// Owned by the identity collaborator; this core only reads the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// A direct message between two users.
///
/// Persisted exactly once by the message repository, which assigns the id.
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub body: MessageBody,
    pub sent_at: Timestamp,
}

/// An account notification belonging to exactly one user.
///
/// Created by external business events (surfaced here through the admin
/// HTTP API); the seen flag flips only via [`Notification::mark_seen`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: UserId,
    pub message: String,
    pub created_at: Timestamp,
    pub seen: bool,
}

impl Notification {
    /// Transition this notification to the seen state.
    pub fn mark_seen(&mut self) {
        self.seen = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_mark_seen() {
        // given:
        let mut notification = Notification {
            id: 1,
            user_id: UserId::new(1).unwrap(),
            message: "welcome".to_string(),
            created_at: Timestamp::new(0),
            seen: false,
        };

        // when:
        notification.mark_seen();

        // then:
        assert!(notification.seen);
    }
}
