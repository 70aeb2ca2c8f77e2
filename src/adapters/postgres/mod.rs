//! PostgreSQL adapters - production implementations of the store ports.
//!
//! Atomicity contracts live in the schema: the decision upsert rides the
//! `(actor_id, target_id)` primary key and pairing insert-if-absent rides
//! the unique index on the canonical `(member_a, member_b)` pair.

mod decision_ledger;
mod message_store;
mod pairing_store;
mod profile_store;

pub use decision_ledger::PostgresDecisionLedger;
pub use message_store::PostgresMessageStore;
pub use pairing_store::PostgresPairingStore;
pub use profile_store::PostgresProfileStore;

use crate::ports::StoreError;

fn store_err(context: &str, e: sqlx::Error) -> StoreError {
    StoreError::new(format!("{context}: {e}"))
}
