//! Message store port.
//!
//! Chat persistence is an external collaborator; the engine only appends
//! and reads pages. Page 1 is the most recent page; within each page
//! messages are ordered oldest first, ready for display.

use async_trait::async_trait;

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::PairingId;

use super::StoreError;

/// Persists chat content for pairings.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a message to a pairing's history.
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError>;

    /// Fetch one page of a pairing's history.
    async fn page(
        &self,
        pairing_id: &PairingId,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<ChatMessage>, StoreError>;
}
