//! Per-identity notification channels.
//!
//! A Channel is the set of live connections addressable by one user id.
//! It exists only while at least one connection is identified as that
//! user; reconnects rebuild it through the identify handshake. Nothing
//! here is persisted.

use std::collections::HashMap;

use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::domain::foundation::UserId;

use super::messages::ServerEvent;

/// Unique identifier for one WebSocket connection, generated server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps user ids to the broadcast senders feeding their live connections.
///
/// `RwLock` because sends vastly outnumber identify/leave. Events sent to
/// one channel are delivered in send order (single broadcast sender per
/// channel); there is no cross-channel ordering guarantee.
pub struct ChannelRegistry {
    channels: RwLock<HashMap<UserId, broadcast::Sender<ServerEvent>>>,
    connections: RwLock<HashMap<ConnectionId, UserId>>,
    channel_capacity: usize,
}

impl ChannelRegistry {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            connections: RwLock::new(HashMap::new()),
            channel_capacity,
        }
    }

    /// Default capacity (128 events buffered per channel).
    pub fn with_default_capacity() -> Self {
        Self::new(128)
    }

    /// Bind a connection to a user's channel, creating the channel on
    /// first identify. Every live receiver for the same user gets every
    /// event (multi-device fan-out).
    pub async fn identify(
        &self,
        user_id: UserId,
        connection_id: ConnectionId,
    ) -> broadcast::Receiver<ServerEvent> {
        let mut channels = self.channels.write().await;
        let sender = channels.entry(user_id).or_insert_with(|| {
            let (tx, _) = broadcast::channel(self.channel_capacity);
            tx
        });

        self.connections
            .write()
            .await
            .insert(connection_id, user_id);

        sender.subscribe()
    }

    /// Remove a connection; drops the channel once its last receiver is
    /// gone. Called from the connection's disconnect path, never by event
    /// producers.
    pub async fn leave(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.write().await;

        if let Some(user_id) = connections.remove(connection_id) {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(&user_id) {
                if sender.receiver_count() == 0 {
                    drop(channels);
                    self.channels.write().await.remove(&user_id);
                }
            }
        }
    }

    /// Push an event to every live connection of `user_id`.
    ///
    /// A user with no live channel simply misses the event; delivery is
    /// best-effort by contract.
    pub async fn send(&self, user_id: &UserId, event: ServerEvent) {
        let channels = self.channels.read().await;
        if let Some(sender) = channels.get(user_id) {
            let _ = sender.send(event);
        }
    }

    /// Live connection count for one user.
    pub async fn connection_count(&self, user_id: &UserId) -> usize {
        self.channels
            .read()
            .await
            .get(user_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    /// Total identified connections across all channels.
    pub async fn total_connections(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Number of channels currently held, including any whose last
    /// receiver is gone but which have not been reclaimed yet.
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identified_connection_receives_channel_events() {
        let registry = ChannelRegistry::with_default_capacity();
        let user = UserId::new();

        let mut rx = registry.identify(user, ConnectionId::new()).await;
        registry.send(&user, ServerEvent::Ready).await;

        assert!(matches!(rx.recv().await.unwrap(), ServerEvent::Ready));
    }

    #[tokio::test]
    async fn multi_device_fan_out_reaches_every_connection() {
        let registry = ChannelRegistry::with_default_capacity();
        let user = UserId::new();

        let mut phone = registry.identify(user, ConnectionId::new()).await;
        let mut laptop = registry.identify(user, ConnectionId::new()).await;

        registry.send(&user, ServerEvent::Interest { from_name: "Alice".into() }).await;

        assert!(matches!(phone.recv().await.unwrap(), ServerEvent::Interest { .. }));
        assert!(matches!(laptop.recv().await.unwrap(), ServerEvent::Interest { .. }));
    }

    #[tokio::test]
    async fn events_are_scoped_to_the_addressed_channel() {
        let registry = ChannelRegistry::with_default_capacity();
        let (alice, bob) = (UserId::new(), UserId::new());

        let _alice_rx = registry.identify(alice, ConnectionId::new()).await;
        let mut bob_rx = registry.identify(bob, ConnectionId::new()).await;

        registry.send(&alice, ServerEvent::Ready).await;
        registry.send(&bob, ServerEvent::Interest { from_name: "Cara".into() }).await;

        // Bob's first event is the interest, not Alice's ready.
        assert!(matches!(bob_rx.recv().await.unwrap(), ServerEvent::Interest { .. }));
    }

    #[tokio::test]
    async fn channel_events_arrive_in_send_order() {
        let registry = ChannelRegistry::with_default_capacity();
        let user = UserId::new();
        let mut rx = registry.identify(user, ConnectionId::new()).await;

        for name in ["a", "b", "c"] {
            registry.send(&user, ServerEvent::Interest { from_name: name.into() }).await;
        }

        for expected in ["a", "b", "c"] {
            match rx.recv().await.unwrap() {
                ServerEvent::Interest { from_name } => assert_eq!(from_name, expected),
                other => panic!("unexpected event {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn leave_cleans_up_empty_channels() {
        let registry = ChannelRegistry::with_default_capacity();
        let user = UserId::new();
        let conn = ConnectionId::new();

        {
            let _rx = registry.identify(user, conn).await;
        }
        registry.leave(&conn).await;

        assert_eq!(registry.connection_count(&user).await, 0);
        assert_eq!(registry.total_connections().await, 0);
    }

    #[tokio::test]
    async fn send_to_offline_user_is_a_noop() {
        let registry = ChannelRegistry::with_default_capacity();
        registry.send(&UserId::new(), ServerEvent::Ready).await;
    }
}
