//! Pairing store port.
//!
//! The central contract is `insert_if_absent`: at most one pairing may
//! ever exist per canonical pair key, even when both members' mutual
//! accepts race. Implementations must back this with a storage-level
//! atomic primitive (unique index, compare-and-insert), never a
//! read-check-write sequence.

use async_trait::async_trait;

use crate::domain::foundation::{PairingId, UserId};
use crate::domain::matching::Pairing;

use super::StoreError;

/// Outcome of an insert-if-absent attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingInsert {
    /// The candidate pairing was stored; this caller won the race.
    Created(Pairing),
    /// A pairing for this pair key already existed; the winner's record
    /// is returned transparently.
    Existing(Pairing),
}

impl PairingInsert {
    pub fn pairing(&self) -> &Pairing {
        match self {
            PairingInsert::Created(p) | PairingInsert::Existing(p) => p,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, PairingInsert::Created(_))
    }
}

/// Durable storage for pairings.
#[async_trait]
pub trait PairingStore: Send + Sync {
    /// Atomically store `candidate` unless a pairing with the same pair
    /// key already exists, in which case the existing record is returned.
    async fn insert_if_absent(&self, candidate: Pairing) -> Result<PairingInsert, StoreError>;

    /// Fetch a pairing by id. Returns `None` if unknown.
    async fn find(&self, id: &PairingId) -> Result<Option<Pairing>, StoreError>;

    /// All pairings `user` is a member of, newest first.
    async fn list_for_member(&self, user: &UserId) -> Result<Vec<Pairing>, StoreError>;
}
