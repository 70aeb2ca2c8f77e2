//! PostgreSQL implementation of MessageStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{MessageId, PairingId, Timestamp, UserId};
use crate::ports::{MessageStore, StoreError};

use super::store_err;

#[derive(Clone)]
pub struct PostgresMessageStore {
    pool: PgPool,
}

impl PostgresMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PostgresMessageStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, pairing_id, sender_id, content, read, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(message.pairing_id.as_uuid())
        .bind(message.sender.as_uuid())
        .bind(&message.content)
        .bind(message.read)
        .bind(message.sent_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| store_err("failed to insert message", e))?;

        Ok(())
    }

    async fn page(
        &self,
        pairing_id: &PairingId,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let page = page.max(1);
        let offset = (page - 1) as i64 * page_size as i64;

        let rows = sqlx::query(
            r#"
            SELECT id, pairing_id, sender_id, content, read, sent_at
            FROM messages
            WHERE pairing_id = $1
            ORDER BY sent_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pairing_id.as_uuid())
        .bind(page_size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_err("failed to fetch message page", e))?;

        // Query walks newest-first for paging; flip so each page reads
        // oldest-first as the client displays it.
        let mut messages: Vec<ChatMessage> = rows
            .iter()
            .map(|r| {
                let id: Uuid = r.try_get("id").map_err(|e| store_err("bad id column", e))?;
                let pairing: Uuid = r
                    .try_get("pairing_id")
                    .map_err(|e| store_err("bad pairing_id column", e))?;
                let sender: Uuid = r
                    .try_get("sender_id")
                    .map_err(|e| store_err("bad sender_id column", e))?;
                let sent_at: DateTime<Utc> = r
                    .try_get("sent_at")
                    .map_err(|e| store_err("bad sent_at column", e))?;
                Ok(ChatMessage {
                    id: MessageId::from_uuid(id),
                    pairing_id: PairingId::from_uuid(pairing),
                    sender: UserId::from_uuid(sender),
                    content: r
                        .try_get("content")
                        .map_err(|e| store_err("bad content column", e))?,
                    read: r.try_get("read").map_err(|e| store_err("bad read column", e))?,
                    sent_at: Timestamp::from_datetime(sent_at),
                })
            })
            .collect::<Result<_, StoreError>>()?;

        messages.reverse();
        Ok(messages)
    }
}
