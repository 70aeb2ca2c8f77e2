//! In-memory decision ledger.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::matching::{Decision, DecisionKind};
use crate::ports::{DecisionLedger, StoreError};

/// Decisions keyed by the ordered `(actor, target)` pair.
///
/// The map key gives upsert semantics for free: re-deciding replaces the
/// value, never adds an entry.
#[derive(Debug, Default)]
pub struct InMemoryDecisionLedger {
    decisions: RwLock<HashMap<(UserId, UserId), Decision>>,
}

impl InMemoryDecisionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn decision_count(&self) -> usize {
        self.decisions.read().await.len()
    }
}

#[async_trait]
impl DecisionLedger for InMemoryDecisionLedger {
    async fn upsert(
        &self,
        actor: UserId,
        target: UserId,
        kind: DecisionKind,
        at: Timestamp,
    ) -> Result<Decision, StoreError> {
        let decision = Decision::new(actor, target, kind, at);
        self.decisions
            .write()
            .await
            .insert((actor, target), decision.clone());
        Ok(decision)
    }

    async fn find(&self, actor: &UserId, target: &UserId) -> Result<Option<Decision>, StoreError> {
        Ok(self.decisions.read().await.get(&(*actor, *target)).cloned())
    }

    async fn decided_targets(&self, actor: &UserId) -> Result<HashSet<UserId>, StoreError> {
        Ok(self
            .decisions
            .read()
            .await
            .keys()
            .filter(|(a, _)| a == actor)
            .map(|(_, t)| *t)
            .collect())
    }
}
