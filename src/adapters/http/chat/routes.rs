//! Axum router configuration for chat endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_history, post_message, ChatAppState};

/// Create the chat API router.
///
/// # Routes
///
/// - `GET /:pairing_id` - Paged message history
/// - `POST /:pairing_id` - Post a message
///
/// Mount at `/api/chat`.
pub fn chat_router() -> Router<ChatAppState> {
    Router::new().route("/:pairing_id", get(get_history).post(post_message))
}
