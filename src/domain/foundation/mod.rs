//! Foundation value objects shared across the domain.

mod auth;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use ids::{MessageId, PairingId, UserId};
pub use timestamp::Timestamp;
