//! Data transfer objects for chat HTTP endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::UserId;

/// Request to post a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessageRequest {
    pub content: String,
}

/// Query parameters for the history endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    /// 1-based page, page 1 being the most recent messages.
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// One stored message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: String,
    pub sender: UserId,
    pub content: String,
    pub read: bool,
    pub sent_at: String,
}

impl From<&ChatMessage> for MessageRecord {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            id: msg.id.to_string(),
            sender: msg.sender,
            content: msg.content.clone(),
            read: msg.read,
            sent_at: msg.sent_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub page: u32,
    pub messages: Vec<MessageRecord>,
}

/// Error payload shared by the chat endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_query_page_defaults_to_one() {
        let query: HistoryQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
    }
}
