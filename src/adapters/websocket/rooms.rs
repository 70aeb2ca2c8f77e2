//! Chat room membership, keyed by pairing.
//!
//! Independent of channel membership: a user can be identified without
//! viewing any chat, and room membership is joined explicitly per pairing
//! after an authorization check in the connection handler.

use std::collections::{HashMap, HashSet};

use tokio::sync::{broadcast, RwLock};

use crate::domain::foundation::PairingId;

use super::channels::ConnectionId;
use super::messages::RoomEvent;

/// Maps pairing ids to the broadcast senders feeding their room members.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<PairingId, broadcast::Sender<RoomEvent>>>,
    /// Rooms each connection has joined, for O(1) cleanup on disconnect.
    memberships: RwLock<HashMap<ConnectionId, HashSet<PairingId>>>,
    channel_capacity: usize,
}

impl RoomRegistry {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            memberships: RwLock::new(HashMap::new()),
            channel_capacity,
        }
    }

    /// Default capacity (128 events buffered per room).
    pub fn with_default_capacity() -> Self {
        Self::new(128)
    }

    /// Add a connection to a pairing's room, creating it on first join.
    ///
    /// The caller is responsible for the pairing-membership authorization
    /// check; the registry only tracks connections.
    pub async fn join(
        &self,
        pairing_id: PairingId,
        connection_id: ConnectionId,
    ) -> broadcast::Receiver<RoomEvent> {
        let mut rooms = self.rooms.write().await;
        let sender = rooms.entry(pairing_id).or_insert_with(|| {
            let (tx, _) = broadcast::channel(self.channel_capacity);
            tx
        });

        self.memberships
            .write()
            .await
            .entry(connection_id)
            .or_default()
            .insert(pairing_id);

        sender.subscribe()
    }

    /// Remove a connection from every room it joined, dropping rooms that
    /// become empty. Cleanup is automatic on disconnect; callers never
    /// unsubscribe explicitly.
    pub async fn leave_all(&self, connection_id: &ConnectionId) {
        let joined = self.memberships.write().await.remove(connection_id);
        let Some(joined) = joined else { return };

        let mut rooms = self.rooms.write().await;
        for pairing_id in joined {
            if let Some(sender) = rooms.get(&pairing_id) {
                if sender.receiver_count() == 0 {
                    rooms.remove(&pairing_id);
                }
            }
        }
    }

    /// Broadcast an event to all connections in a room. No-op when the
    /// room has no members.
    pub async fn broadcast(&self, pairing_id: &PairingId, event: RoomEvent) {
        let rooms = self.rooms.read().await;
        if let Some(sender) = rooms.get(pairing_id) {
            let _ = sender.send(event);
        }
    }

    /// Whether this connection has joined this room.
    pub async fn is_member(&self, connection_id: &ConnectionId, pairing_id: &PairingId) -> bool {
        self.memberships
            .read()
            .await
            .get(connection_id)
            .is_some_and(|joined| joined.contains(pairing_id))
    }

    /// Live member count for one room.
    pub async fn member_count(&self, pairing_id: &PairingId) -> usize {
        self.rooms
            .read()
            .await
            .get(pairing_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    /// Number of rooms currently held, including any whose last receiver
    /// is gone but which have not been reclaimed yet.
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
