//! Transport port: the group-membership/broadcast primitive.
//!
//! The delivery core never reimplements pub/sub; it addresses a user's
//! live connections through this capability and lets the implementation
//! decide how membership sets are kept. The in-memory implementation
//! lives in `infrastructure::channel`.

use std::fmt;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use super::value_object::RoutingKey;

/// Identity of one live connection, used as the membership handle in the
/// channel layer. Two sockets of the same user get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh connection id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Group-membership/broadcast capability.
///
/// Semantics: `group_send` is at-least-once to all members of `key` at the
/// moment of send; connections joining afterwards receive nothing. All
/// three operations must be safe to call concurrently from many sessions.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChannelLayer: Send + Sync {
    /// Register a connection's outbound sender under a routing key.
    async fn group_add(
        &self,
        key: RoutingKey,
        connection: ConnectionId,
        sender: UnboundedSender<String>,
    );

    /// Remove a connection from a routing key's membership set.
    ///
    /// Removing an unknown member is a no-op.
    async fn group_discard(&self, key: &RoutingKey, connection: &ConnectionId);

    /// Deliver a serialized frame to every current member of the group.
    async fn group_send(&self, key: &RoutingKey, payload: String);
}
