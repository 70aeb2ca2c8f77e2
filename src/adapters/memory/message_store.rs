//! In-memory message store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::PairingId;
use crate::ports::{MessageStore, StoreError};

/// Messages per pairing in append order (oldest first).
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    messages: RwLock<HashMap<PairingId, Vec<ChatMessage>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn message_count(&self) -> usize {
        self.messages.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError> {
        self.messages
            .write()
            .await
            .entry(message.pairing_id)
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn page(
        &self,
        pairing_id: &PairingId,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self.messages.read().await;
        let history = match messages.get(pairing_id) {
            Some(h) => h,
            None => return Ok(Vec::new()),
        };

        // Page 1 is the newest slice; slices stay oldest-first internally.
        let len = history.len();
        let page = page.max(1) as usize;
        let size = page_size as usize;
        let end = len.saturating_sub((page - 1) * size);
        let start = end.saturating_sub(size);
        Ok(history[start..end].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, UserId};

    async fn seeded(count: usize) -> (InMemoryMessageStore, PairingId) {
        let store = InMemoryMessageStore::new();
        let pairing_id = PairingId::new();
        let sender = UserId::new();
        for i in 0..count {
            let msg = ChatMessage::new(pairing_id, sender, format!("m{i}"), Timestamp::now());
            store.append(&msg).await.unwrap();
        }
        (store, pairing_id)
    }

    #[tokio::test]
    async fn page_one_is_the_newest_slice_oldest_first() {
        let (store, pairing_id) = seeded(5).await;

        let page = store.page(&pairing_id, 1, 2).await.unwrap();
        let contents: Vec<&str> = page.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m3", "m4"]);
    }

    #[tokio::test]
    async fn later_pages_walk_backwards_through_history() {
        let (store, pairing_id) = seeded(5).await;

        let page2 = store.page(&pairing_id, 2, 2).await.unwrap();
        let contents: Vec<&str> = page2.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m1", "m2"]);

        let page3 = store.page(&pairing_id, 3, 2).await.unwrap();
        let contents: Vec<&str> = page3.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m0"]);

        assert!(store.page(&pairing_id, 4, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_pairing_has_empty_history() {
        let (store, _) = seeded(2).await;
        assert!(store.page(&PairingId::new(), 1, 50).await.unwrap().is_empty());
    }
}
