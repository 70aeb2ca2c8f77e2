//! Ports: async seams between the engine and its collaborators.
//!
//! Each port is a `Send + Sync` trait object boundary. Postgres adapters
//! back them in production; in-memory adapters back them in tests.

mod decision_ledger;
mod message_store;
mod notifier;
mod pairing_store;
mod profile_store;
mod session_validator;

pub use decision_ledger::DecisionLedger;
pub use message_store::MessageStore;
pub use notifier::{CounterpartInfo, Notifier};
pub use pairing_store::{PairingInsert, PairingStore};
pub use profile_store::ProfileStore;
pub use session_validator::SessionValidator;

use thiserror::Error;

/// Transient failure in a backing store.
///
/// The engine performs no implicit retry; the error propagates to the
/// caller, who decides whether to re-issue.
#[derive(Debug, Clone, Error)]
#[error("store failure: {0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}
