//! Application layer: command and query handlers.
//!
//! Handlers hold `Arc<dyn Port>` collaborators and orchestrate domain
//! logic against them. They are transport-agnostic; the HTTP and
//! WebSocket adapters call into them.

pub mod chat;
pub mod decisions;
pub mod pairings;
pub mod recommendations;

pub use chat::{ChatHistoryHandler, PostMessageHandler};
pub use decisions::{DecisionHandler, DecisionOutcome};
pub use pairings::{ListPairingsHandler, PairingView};
pub use recommendations::{RecommendationHandler, ScoredCandidate};
