//! Wire protocol for the realtime channel.

use serde::{Deserialize, Serialize};

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{PairingId, UserId};
use crate::ports::CounterpartInfo;

use super::channels::ConnectionId;

// ============================================
// Client → Server Events
// ============================================

/// All events a client may send after connecting.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Bind this connection to the user's channel. Must be the first
    /// event; everything else is ignored until the server acks `ready`.
    Identify { user_id: UserId },

    /// Join a pairing's chat room (membership required).
    JoinRoom { pairing_id: PairingId },

    /// Typing indicator, relayed to the other room members.
    TypingStart { pairing_id: PairingId },
    TypingStop { pairing_id: PairingId },

    /// Post a chat message through the relay.
    PostMessage { pairing_id: PairingId, content: String },
}

// ============================================
// Server → Client Events
// ============================================

/// All events the server pushes to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Identify handshake acknowledged.
    Ready,

    /// A mutual accept formed a pairing involving this user.
    Paired {
        pairing_id: PairingId,
        counterpart: CounterpartInfo,
    },

    /// Someone accepted this user; no reciprocal decision yet.
    Interest { from_name: String },

    TypingStart { pairing_id: PairingId },
    TypingStop { pairing_id: PairingId },

    /// A message was posted into a room this connection has joined.
    MessagePosted {
        pairing_id: PairingId,
        message: MessagePayload,
    },

    Error { code: String, message: String },
}

/// Message body as pushed to room members.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub id: String,
    pub sender: UserId,
    pub content: String,
    pub sent_at: String,
}

impl From<&ChatMessage> for MessagePayload {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            id: msg.id.to_string(),
            sender: msg.sender,
            content: msg.content.clone(),
            sent_at: msg.sent_at.to_rfc3339(),
        }
    }
}

// ============================================
// Internal Types
// ============================================

/// Envelope broadcast inside a room.
///
/// `origin` marks the connection that produced the event; typing
/// indicators set it so the sender's own forwarder drops the echo, while
/// posted messages leave it empty to reach every device, author included.
#[derive(Debug, Clone)]
pub struct RoomEvent {
    pub origin: Option<ConnectionId>,
    pub event: ServerEvent,
}

impl RoomEvent {
    pub fn from_connection(origin: ConnectionId, event: ServerEvent) -> Self {
        Self {
            origin: Some(origin),
            event,
        }
    }

    pub fn to_everyone(event: ServerEvent) -> Self {
        Self { origin: None, event }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_event_deserializes_identify() {
        let user = UserId::new();
        let json = format!(r#"{{"type": "identify", "user_id": "{user}"}}"#);
        let event: ClientEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(event, ClientEvent::Identify { user_id } if user_id == user));
    }

    #[test]
    fn client_event_deserializes_post_message() {
        let pairing = PairingId::new();
        let json = format!(r#"{{"type": "post_message", "pairing_id": "{pairing}", "content": "hi"}}"#);
        let event: ClientEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(event, ClientEvent::PostMessage { content, .. } if content == "hi"));
    }

    #[test]
    fn server_event_serializes_with_type_tag() {
        let json = serde_json::to_string(&ServerEvent::Ready).unwrap();
        assert_eq!(json, r#"{"type":"ready"}"#);
    }

    #[test]
    fn paired_event_carries_counterpart_info() {
        let event = ServerEvent::Paired {
            pairing_id: PairingId::new(),
            counterpart: CounterpartInfo {
                id: UserId::new(),
                name: "Bob".to_string(),
                photo: None,
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"paired""#));
        assert!(json.contains(r#""name":"Bob""#));
    }
}
