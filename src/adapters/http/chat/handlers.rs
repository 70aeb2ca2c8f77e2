//! HTTP handlers for chat endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::application::{ChatHistoryHandler, PostMessageHandler};
use crate::domain::chat::ChatError;
use crate::domain::foundation::PairingId;

use super::super::middleware::RequireAuth;
use super::dto::{ErrorResponse, HistoryQuery, HistoryResponse, MessageRecord, PostMessageRequest};

/// Application state for chat endpoints.
#[derive(Clone)]
pub struct ChatAppState {
    pub post_message: Arc<PostMessageHandler>,
    pub history: Arc<ChatHistoryHandler>,
}

/// Get a page of message history, oldest first within the page.
///
/// GET /api/chat/:pairing_id?page=1
pub async fn get_history(
    State(state): State<ChatAppState>,
    RequireAuth(user): RequireAuth,
    Path(pairing_id): Path<PairingId>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    match state.history.handle(pairing_id, user.id, query.page).await {
        Ok(messages) => {
            let messages = messages.iter().map(MessageRecord::from).collect();
            Json(HistoryResponse {
                page: query.page.max(1),
                messages,
            })
            .into_response()
        }
        Err(e) => chat_error_response(e).into_response(),
    }
}

/// Post a message into a pairing's room.
///
/// POST /api/chat/:pairing_id
pub async fn post_message(
    State(state): State<ChatAppState>,
    RequireAuth(user): RequireAuth,
    Path(pairing_id): Path<PairingId>,
    Json(request): Json<PostMessageRequest>,
) -> impl IntoResponse {
    match state
        .post_message
        .handle(pairing_id, user.id, request.content)
        .await
    {
        Ok(message) => (
            StatusCode::CREATED,
            Json(MessageRecord::from(&message)),
        )
            .into_response(),
        Err(e) => chat_error_response(e).into_response(),
    }
}

/// Map chat errors to HTTP status codes.
fn chat_error_response(e: ChatError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &e {
        ChatError::PairingNotFound(_) => (StatusCode::NOT_FOUND, "PAIRING_NOT_FOUND"),
        ChatError::NotAMember => (StatusCode::UNAUTHORIZED, "NOT_A_MEMBER"),
        ChatError::EmptyContent => (StatusCode::BAD_REQUEST, "EMPTY_CONTENT"),
        ChatError::Store(msg) => {
            tracing::error!("Store failure while handling chat request: {}", msg);
            (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR")
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
            code: code.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryMessageStore, InMemoryPairingStore};
    use crate::adapters::websocket::{ChannelRegistry, RoomRegistry, WsNotifier};
    use crate::domain::foundation::{AuthenticatedUser, Timestamp, UserId};
    use crate::domain::matching::{PairKey, Pairing};
    use crate::ports::PairingStore;

    fn test_state() -> (ChatAppState, Arc<InMemoryPairingStore>) {
        let pairings = Arc::new(InMemoryPairingStore::new());
        let messages = Arc::new(InMemoryMessageStore::new());
        let notifier = Arc::new(WsNotifier::new(
            Arc::new(ChannelRegistry::with_default_capacity()),
            Arc::new(RoomRegistry::with_default_capacity()),
        ));

        let state = ChatAppState {
            post_message: Arc::new(PostMessageHandler::new(
                pairings.clone(),
                messages.clone(),
                notifier,
            )),
            history: Arc::new(ChatHistoryHandler::new(pairings.clone(), messages)),
        };
        (state, pairings)
    }

    fn auth(user_id: UserId) -> RequireAuth {
        RequireAuth(AuthenticatedUser::new(user_id, "Test User"))
    }

    async fn seeded_pairing(pairings: &InMemoryPairingStore) -> (Pairing, UserId, UserId) {
        let a = UserId::new();
        let b = UserId::new();
        let key = PairKey::new(a, b).unwrap();
        let pairing = Pairing::new(PairingId::new(), key, Timestamp::now());
        pairings.insert_if_absent(pairing.clone()).await.unwrap();
        (pairing, a, b)
    }

    #[tokio::test]
    async fn member_can_post_a_message() {
        let (state, pairings) = test_state();
        let (pairing, a, _b) = seeded_pairing(&pairings).await;

        let response = post_message(
            State(state),
            auth(a),
            Path(pairing.id),
            Json(PostMessageRequest {
                content: "see you at 6".to_string(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn non_member_post_is_401() {
        let (state, pairings) = test_state();
        let (pairing, _a, _b) = seeded_pairing(&pairings).await;

        let response = post_message(
            State(state),
            auth(UserId::new()),
            Path(pairing.id),
            Json(PostMessageRequest {
                content: "hi".to_string(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_member_history_read_is_401() {
        let (state, pairings) = test_state();
        let (pairing, _a, _b) = seeded_pairing(&pairings).await;

        let response = get_history(
            State(state),
            auth(UserId::new()),
            Path(pairing.id),
            Query(HistoryQuery { page: 1 }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_pairing_is_404() {
        let (state, _pairings) = test_state();

        let response = get_history(
            State(state),
            auth(UserId::new()),
            Path(PairingId::new()),
            Query(HistoryQuery { page: 1 }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_content_is_400() {
        let (state, pairings) = test_state();
        let (pairing, a, _b) = seeded_pairing(&pairings).await;

        let response = post_message(
            State(state),
            auth(a),
            Path(pairing.id),
            Json(PostMessageRequest {
                content: "   ".to_string(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn member_reads_history() {
        let (state, pairings) = test_state();
        let (pairing, a, b) = seeded_pairing(&pairings).await;

        post_message(
            State(state.clone()),
            auth(a),
            Path(pairing.id),
            Json(PostMessageRequest {
                content: "first".to_string(),
            }),
        )
        .await
        .into_response();

        let response = get_history(
            State(state),
            auth(b),
            Path(pairing.id),
            Query(HistoryQuery { page: 1 }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
