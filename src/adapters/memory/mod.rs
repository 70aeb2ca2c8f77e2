//! In-memory adapters for every store port.
//!
//! Used by unit tests and local development. Each adapter guards its state
//! with a single lock, so check-and-mutate operations are atomic the same
//! way the Postgres adapters are atomic through unique indexes.

mod decision_ledger;
mod message_store;
mod pairing_store;
mod profile_store;

pub use decision_ledger::InMemoryDecisionLedger;
pub use message_store::InMemoryMessageStore;
pub use pairing_store::InMemoryPairingStore;
pub use profile_store::InMemoryProfileStore;
