//! Matching domain: compatibility scoring, decisions and pairings.

mod decision;
mod errors;
mod pairing;
pub mod scorer;

pub use decision::{Decision, DecisionKind};
pub use errors::MatchingError;
pub use pairing::{PairKey, Pairing};
