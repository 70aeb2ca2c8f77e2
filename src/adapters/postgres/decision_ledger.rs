//! PostgreSQL implementation of DecisionLedger.
//!
//! Upsert rides `ON CONFLICT` on the `(actor_id, target_id)` primary key,
//! so concurrent decisions for the same ordered pair can never duplicate.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::matching::{Decision, DecisionKind};
use crate::ports::{DecisionLedger, StoreError};

use super::store_err;

#[derive(Clone)]
pub struct PostgresDecisionLedger {
    pool: PgPool,
}

impl PostgresDecisionLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DecisionLedger for PostgresDecisionLedger {
    async fn upsert(
        &self,
        actor: UserId,
        target: UserId,
        kind: DecisionKind,
        at: Timestamp,
    ) -> Result<Decision, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO decisions (actor_id, target_id, kind, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (actor_id, target_id)
            DO UPDATE SET kind = EXCLUDED.kind, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(actor.as_uuid())
        .bind(target.as_uuid())
        .bind(kind.as_str())
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| store_err("failed to upsert decision", e))?;

        Ok(Decision::new(actor, target, kind, at))
    }

    async fn find(&self, actor: &UserId, target: &UserId) -> Result<Option<Decision>, StoreError> {
        let row = sqlx::query(
            "SELECT kind, updated_at FROM decisions WHERE actor_id = $1 AND target_id = $2",
        )
        .bind(actor.as_uuid())
        .bind(target.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("failed to fetch decision", e))?;

        row.map(|r| {
            let kind: String = r
                .try_get("kind")
                .map_err(|e| store_err("bad kind column", e))?;
            let kind: DecisionKind = kind.parse().map_err(StoreError::new)?;
            let updated_at: DateTime<Utc> = r
                .try_get("updated_at")
                .map_err(|e| store_err("bad updated_at column", e))?;
            Ok(Decision::new(
                *actor,
                *target,
                kind,
                Timestamp::from_datetime(updated_at),
            ))
        })
        .transpose()
    }

    async fn decided_targets(&self, actor: &UserId) -> Result<HashSet<UserId>, StoreError> {
        let rows = sqlx::query("SELECT target_id FROM decisions WHERE actor_id = $1")
            .bind(actor.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_err("failed to list decided targets", e))?;

        rows.iter()
            .map(|r| {
                let id: Uuid = r
                    .try_get("target_id")
                    .map_err(|e| store_err("bad target_id column", e))?;
                Ok(UserId::from_uuid(id))
            })
            .collect()
    }
}
