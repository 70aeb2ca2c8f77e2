//! Error types for matching operations.

use thiserror::Error;

use crate::domain::foundation::{PairingId, UserId};

/// Errors surfaced by the recommendation, decision and pairing flows.
#[derive(Debug, Clone, Error)]
pub enum MatchingError {
    /// A decision must target another user.
    #[error("Cannot record a decision about yourself")]
    InvalidTarget,

    #[error("Profile not found: {0}")]
    ProfileNotFound(UserId),

    #[error("Pairing not found: {0}")]
    PairingNotFound(PairingId),

    /// Transient store failure; the caller may retry.
    #[error("Store failure: {0}")]
    Store(String),
}
