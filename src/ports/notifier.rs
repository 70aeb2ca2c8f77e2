//! Realtime notification port.
//!
//! Delivery is best-effort and at-most-once: a disconnected recipient
//! silently misses the event and resyncs on reconnect. Methods therefore
//! return nothing; only the state mutation preceding a notification can
//! fail, and handlers skip notification when it does.

use async_trait::async_trait;

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{PairingId, UserId};

/// Minimal display info about the other member of a pairing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CounterpartInfo {
    pub id: UserId,
    pub name: String,
    pub photo: Option<String>,
}

/// Pushes pairing and chat events to live connections.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tell `member` they have been paired, with the counterpart's info.
    async fn paired(&self, pairing_id: PairingId, member: UserId, counterpart: CounterpartInfo);

    /// Tell `target` that someone accepted them (no reciprocal yet).
    async fn interest(&self, target: UserId, from_name: String);

    /// Relay a freshly persisted message to the pairing's room, author
    /// included (multi-device consistency).
    async fn message_posted(&self, pairing_id: PairingId, message: &ChatMessage);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifier_is_object_safe() {
        fn _accepts_dyn(_n: &dyn Notifier) {}
    }
}
