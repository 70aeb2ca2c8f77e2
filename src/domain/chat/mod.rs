//! Chat domain: messages exchanged inside a pairing's room.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{MessageId, PairingId, Timestamp, UserId};

/// A persisted chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub pairing_id: PairingId,
    pub sender: UserId,
    pub content: String,
    pub read: bool,
    pub sent_at: Timestamp,
}

impl ChatMessage {
    /// Builds a new unread message for a pairing's room.
    pub fn new(
        pairing_id: PairingId,
        sender: UserId,
        content: impl Into<String>,
        sent_at: Timestamp,
    ) -> Self {
        Self {
            id: MessageId::new(),
            pairing_id,
            sender,
            content: content.into(),
            read: false,
            sent_at,
        }
    }
}

/// Errors surfaced by the chat relay.
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    #[error("Pairing not found: {0}")]
    PairingNotFound(PairingId),

    /// Posting or reading requires pairing membership.
    #[error("Not a member of this pairing")]
    NotAMember,

    #[error("Message content cannot be empty")]
    EmptyContent,

    /// Transient store failure; the caller may retry.
    #[error("Store failure: {0}")]
    Store(String),
}
