//! HTTP adapter for matching endpoints.
//!
//! - `GET /api/matches` - Current pairings for the authenticated user
//! - `GET /api/matches/recommendations` - Ranked partner candidates
//! - `POST /api/matches/decision` - Record an accept or reject

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::MatchesAppState;
pub use routes::matches_router;
