//! PostgreSQL implementation of PairingStore.
//!
//! The insert-if-absent contract rides the unique index on the canonical
//! `(member_a, member_b)` pair: `ON CONFLICT DO NOTHING` with a zero row
//! count means another creator won, and the winner's row is re-read. No
//! read-check-write sequence anywhere.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{PairingId, Timestamp, UserId};
use crate::domain::matching::{PairKey, Pairing};
use crate::ports::{PairingInsert, PairingStore, StoreError};

use super::store_err;

#[derive(Clone)]
pub struct PostgresPairingStore {
    pool: PgPool,
}

impl PostgresPairingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_key(&self, key: &PairKey) -> Result<Option<Pairing>, StoreError> {
        let row = sqlx::query(
            "SELECT id, member_a, member_b, created_at FROM pairings \
             WHERE member_a = $1 AND member_b = $2",
        )
        .bind(key.first().as_uuid())
        .bind(key.second().as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("failed to fetch pairing by members", e))?;

        row.map(|r| pairing_from_row(&r)).transpose()
    }
}

#[async_trait]
impl PairingStore for PostgresPairingStore {
    async fn insert_if_absent(&self, candidate: Pairing) -> Result<PairingInsert, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO pairings (id, member_a, member_b, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (member_a, member_b) DO NOTHING
            "#,
        )
        .bind(candidate.id.as_uuid())
        .bind(candidate.key.first().as_uuid())
        .bind(candidate.key.second().as_uuid())
        .bind(candidate.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| store_err("failed to insert pairing", e))?;

        if result.rows_affected() == 1 {
            return Ok(PairingInsert::Created(candidate));
        }

        // Lost the race; the conflicting row is committed by now.
        match self.find_by_key(&candidate.key).await? {
            Some(existing) => Ok(PairingInsert::Existing(existing)),
            None => Err(StoreError::new(
                "pairing insert conflicted but existing row not found",
            )),
        }
    }

    async fn find(&self, id: &PairingId) -> Result<Option<Pairing>, StoreError> {
        let row = sqlx::query(
            "SELECT id, member_a, member_b, created_at FROM pairings WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("failed to fetch pairing", e))?;

        row.map(|r| pairing_from_row(&r)).transpose()
    }

    async fn list_for_member(&self, user: &UserId) -> Result<Vec<Pairing>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, member_a, member_b, created_at FROM pairings \
             WHERE member_a = $1 OR member_b = $1 \
             ORDER BY created_at DESC",
        )
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_err("failed to list pairings", e))?;

        rows.iter().map(pairing_from_row).collect()
    }
}

fn pairing_from_row(row: &PgRow) -> Result<Pairing, StoreError> {
    let id: Uuid = row.try_get("id").map_err(|e| store_err("bad id column", e))?;
    let member_a: Uuid = row
        .try_get("member_a")
        .map_err(|e| store_err("bad member_a column", e))?;
    let member_b: Uuid = row
        .try_get("member_b")
        .map_err(|e| store_err("bad member_b column", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| store_err("bad created_at column", e))?;

    let key = PairKey::new(UserId::from_uuid(member_a), UserId::from_uuid(member_b))
        .ok_or_else(|| StoreError::new("pairing row has identical members"))?;

    Ok(Pairing::new(
        PairingId::from_uuid(id),
        key,
        Timestamp::from_datetime(created_at),
    ))
}
