//! In-memory pairing store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{PairingId, UserId};
use crate::domain::matching::{PairKey, Pairing};
use crate::ports::{PairingInsert, PairingStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    /// Insertion-ordered pairings; the key index below points into this.
    ordered: Vec<Pairing>,
    by_key: HashMap<PairKey, usize>,
}

/// Pairings guarded by one lock, so the key check and the insert are a
/// single atomic step; concurrent `insert_if_absent` calls for the same
/// pair cannot both create.
#[derive(Debug, Default)]
pub struct InMemoryPairingStore {
    inner: RwLock<Inner>,
}

impl InMemoryPairingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn pairing_count(&self) -> usize {
        self.inner.read().await.ordered.len()
    }
}

#[async_trait]
impl PairingStore for InMemoryPairingStore {
    async fn insert_if_absent(&self, candidate: Pairing) -> Result<PairingInsert, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(&idx) = inner.by_key.get(&candidate.key) {
            return Ok(PairingInsert::Existing(inner.ordered[idx].clone()));
        }
        let idx = inner.ordered.len();
        inner.by_key.insert(candidate.key, idx);
        inner.ordered.push(candidate.clone());
        Ok(PairingInsert::Created(candidate))
    }

    async fn find(&self, id: &PairingId) -> Result<Option<Pairing>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .ordered
            .iter()
            .find(|p| p.id == *id)
            .cloned())
    }

    async fn list_for_member(&self, user: &UserId) -> Result<Vec<Pairing>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .ordered
            .iter()
            .rev()
            .filter(|p| p.has_member(user))
            .cloned()
            .collect())
    }
}
