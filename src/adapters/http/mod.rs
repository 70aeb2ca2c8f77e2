//! HTTP adapters - REST API implementations.
//!
//! Each feature area has its own module with dto, handlers and routes.

pub mod chat;
pub mod matches;
pub mod middleware;

pub use chat::{chat_router, ChatAppState};
pub use matches::{matches_router, MatchesAppState};
