//! HTTP adapter for chat endpoints.
//!
//! - `GET /api/chat/:pairing_id` - Paged message history
//! - `POST /api/chat/:pairing_id` - Post a message into the pairing

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::ChatAppState;
pub use routes::chat_router;
