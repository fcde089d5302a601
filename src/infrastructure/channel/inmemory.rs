//! InMemory channel layer implementation.
//!
//! Default backing for the group-membership/broadcast port: a map from
//! routing key to the set of active connection senders, guarded by a mutex.
//! All membership mutation and broadcast goes through this one lock, so
//! concurrent register/deregister/send from many sessions cannot corrupt
//! a membership set.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::domain::{ChannelLayer, ConnectionId, RoutingKey};

/// In-memory group-broadcast primitive.
#[derive(Debug, Default)]
pub struct InMemoryChannelLayer {
    groups: Mutex<HashMap<RoutingKey, HashMap<ConnectionId, UnboundedSender<String>>>>,
}

impl InMemoryChannelLayer {
    /// Create an empty channel layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live members of a group (test/debug accessor).
    pub async fn member_count(&self, key: &RoutingKey) -> usize {
        let groups = self.groups.lock().await;
        groups.get(key).map_or(0, HashMap::len)
    }
}

#[async_trait]
impl ChannelLayer for InMemoryChannelLayer {
    async fn group_add(
        &self,
        key: RoutingKey,
        connection: ConnectionId,
        sender: UnboundedSender<String>,
    ) {
        let mut groups = self.groups.lock().await;
        groups.entry(key).or_default().insert(connection, sender);
    }

    async fn group_discard(&self, key: &RoutingKey, connection: &ConnectionId) {
        let mut groups = self.groups.lock().await;
        if let Some(members) = groups.get_mut(key) {
            members.remove(connection);
            if members.is_empty() {
                groups.remove(key);
            }
        }
    }

    async fn group_send(&self, key: &RoutingKey, payload: String) {
        let groups = self.groups.lock().await;
        let Some(members) = groups.get(key) else {
            return;
        };
        for (connection, sender) in members.iter() {
            // A closed sender means the socket task already went away; its
            // membership goes with the session teardown, so just log here.
            if sender.send(payload.clone()).is_err() {
                tracing::warn!("Failed to deliver to connection '{}' in group '{}'", connection, key);
            }
        }
    }
}
