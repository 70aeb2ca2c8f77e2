//! ChatRelay - post messages into a pairing's room and read history.

use std::sync::Arc;

use crate::domain::chat::{ChatError, ChatMessage};
use crate::domain::foundation::{PairingId, Timestamp, UserId};
use crate::ports::{MessageStore, Notifier, PairingStore};

/// Messages per history page.
pub const MESSAGE_PAGE_SIZE: u32 = 50;

/// Posts a message: membership check, persist, then room broadcast.
pub struct PostMessageHandler {
    pairings: Arc<dyn PairingStore>,
    messages: Arc<dyn MessageStore>,
    notifier: Arc<dyn Notifier>,
}

impl PostMessageHandler {
    pub fn new(
        pairings: Arc<dyn PairingStore>,
        messages: Arc<dyn MessageStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            pairings,
            messages,
            notifier,
        }
    }

    /// Persist and broadcast a message.
    ///
    /// The author must be a member of the pairing; a non-member attempt is
    /// denied before any persistence call. The broadcast runs only after
    /// the store accepted the message, and includes the author so their
    /// other devices stay consistent.
    pub async fn handle(
        &self,
        pairing_id: PairingId,
        author: UserId,
        content: String,
    ) -> Result<ChatMessage, ChatError> {
        if content.trim().is_empty() {
            return Err(ChatError::EmptyContent);
        }

        let pairing = self
            .pairings
            .find(&pairing_id)
            .await
            .map_err(|e| ChatError::Store(e.to_string()))?
            .ok_or(ChatError::PairingNotFound(pairing_id))?;

        if !pairing.has_member(&author) {
            tracing::warn!(%pairing_id, %author, "rejected post into foreign pairing");
            return Err(ChatError::NotAMember);
        }

        let message = ChatMessage::new(pairing_id, author, content, Timestamp::now());
        self.messages
            .append(&message)
            .await
            .map_err(|e| ChatError::Store(e.to_string()))?;

        self.notifier.message_posted(pairing_id, &message).await;

        Ok(message)
    }
}

/// Reads one page of a pairing's message history.
pub struct ChatHistoryHandler {
    pairings: Arc<dyn PairingStore>,
    messages: Arc<dyn MessageStore>,
}

impl ChatHistoryHandler {
    pub fn new(pairings: Arc<dyn PairingStore>, messages: Arc<dyn MessageStore>) -> Self {
        Self { pairings, messages }
    }

    /// Page 1 is the most recent page; within a page messages are ordered
    /// oldest first. Only members may read.
    pub async fn handle(
        &self,
        pairing_id: PairingId,
        requester: UserId,
        page: u32,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let pairing = self
            .pairings
            .find(&pairing_id)
            .await
            .map_err(|e| ChatError::Store(e.to_string()))?
            .ok_or(ChatError::PairingNotFound(pairing_id))?;

        if !pairing.has_member(&requester) {
            tracing::warn!(%pairing_id, %requester, "rejected read of foreign pairing");
            return Err(ChatError::NotAMember);
        }

        let page = page.max(1);
        self.messages
            .page(&pairing_id, page, MESSAGE_PAGE_SIZE)
            .await
            .map_err(|e| ChatError::Store(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryMessageStore, InMemoryPairingStore};
    use crate::domain::matching::{PairKey, Pairing};
    use crate::ports::CounterpartInfo;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingNotifier {
        posted: Mutex<Vec<(PairingId, ChatMessage)>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn paired(&self, _: PairingId, _: UserId, _: CounterpartInfo) {}
        async fn interest(&self, _: UserId, _: String) {}
        async fn message_posted(&self, pairing_id: PairingId, message: &ChatMessage) {
            self.posted.lock().unwrap().push((pairing_id, message.clone()));
        }
    }

    fn uid(n: u128) -> UserId {
        UserId::from_uuid(Uuid::from_u128(n))
    }

    async fn paired_fixture() -> (
        Arc<InMemoryPairingStore>,
        Arc<InMemoryMessageStore>,
        Arc<RecordingNotifier>,
        PairingId,
    ) {
        let pairings = Arc::new(InMemoryPairingStore::new());
        let messages = Arc::new(InMemoryMessageStore::new());
        let notifier = Arc::new(RecordingNotifier::default());

        let pairing = Pairing::new(
            PairingId::new(),
            PairKey::new(uid(1), uid(2)).unwrap(),
            Timestamp::now(),
        );
        let id = pairing.id;
        pairings.insert_if_absent(pairing).await.unwrap();

        (pairings, messages, notifier, id)
    }

    #[tokio::test]
    async fn member_post_persists_and_broadcasts() {
        let (pairings, messages, notifier, pairing_id) = paired_fixture().await;
        let handler = PostMessageHandler::new(pairings, messages.clone(), notifier.clone());

        let msg = handler.handle(pairing_id, uid(1), "leg day?".into()).await.unwrap();

        assert_eq!(messages.message_count().await, 1);
        let posted = notifier.posted.lock().unwrap();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].1.id, msg.id);
    }

    #[tokio::test]
    async fn non_member_post_is_denied_without_side_effects() {
        let (pairings, messages, notifier, pairing_id) = paired_fixture().await;
        let handler = PostMessageHandler::new(pairings, messages.clone(), notifier.clone());

        let err = handler.handle(pairing_id, uid(9), "hi".into()).await.unwrap_err();

        assert!(matches!(err, ChatError::NotAMember));
        assert_eq!(messages.message_count().await, 0);
        assert!(notifier.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_pairing_is_not_found() {
        let (pairings, messages, notifier, _) = paired_fixture().await;
        let handler = PostMessageHandler::new(pairings, messages, notifier);

        let err = handler
            .handle(PairingId::new(), uid(1), "hi".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::PairingNotFound(_)));
    }

    #[tokio::test]
    async fn blank_content_is_rejected() {
        let (pairings, messages, notifier, pairing_id) = paired_fixture().await;
        let handler = PostMessageHandler::new(pairings, messages, notifier);

        let err = handler.handle(pairing_id, uid(1), "   ".into()).await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyContent));
    }

    #[tokio::test]
    async fn history_pages_are_oldest_first_within_most_recent_page() {
        let (pairings, messages, notifier, pairing_id) = paired_fixture().await;
        let post = PostMessageHandler::new(pairings.clone(), messages.clone(), notifier);
        let history = ChatHistoryHandler::new(pairings, messages);

        for i in 0..3 {
            post.handle(pairing_id, uid(1), format!("msg {i}")).await.unwrap();
        }

        let page = history.handle(pairing_id, uid(2), 1).await.unwrap();
        let contents: Vec<&str> = page.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["msg 0", "msg 1", "msg 2"]);
    }

    #[tokio::test]
    async fn history_denies_non_members() {
        let (pairings, messages, _, pairing_id) = paired_fixture().await;
        let history = ChatHistoryHandler::new(pairings, messages);

        let err = history.handle(pairing_id, uid(9), 1).await.unwrap_err();
        assert!(matches!(err, ChatError::NotAMember));
    }
}
