//! Decision ledger port (write side).
//!
//! The ledger is the only mutator of Decision state. Implementations must
//! provide atomic upsert keyed by the ordered `(actor, target)` pair; a
//! read-then-write implementation would duplicate records under races.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::matching::{Decision, DecisionKind};

use super::StoreError;

/// Durable record of every accept/reject decision.
#[async_trait]
pub trait DecisionLedger: Send + Sync {
    /// Upsert the decision for `(actor, target)`.
    ///
    /// Overwrites kind and timestamp if a prior decision exists, creates
    /// otherwise. Never duplicates.
    async fn upsert(
        &self,
        actor: UserId,
        target: UserId,
        kind: DecisionKind,
        at: Timestamp,
    ) -> Result<Decision, StoreError>;

    /// Look up the decision `actor` has recorded about `target`, if any.
    async fn find(&self, actor: &UserId, target: &UserId) -> Result<Option<Decision>, StoreError>;

    /// All targets `actor` has ever decided about, regardless of kind.
    ///
    /// Used by the recommendation feed to exclude touched candidates.
    async fn decided_targets(&self, actor: &UserId) -> Result<HashSet<UserId>, StoreError>;
}
