//! HTTP handlers for matching endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::application::{DecisionHandler, ListPairingsHandler, RecommendationHandler};
use crate::domain::matching::{DecisionKind, MatchingError};

use super::super::middleware::RequireAuth;
use super::dto::{
    DecideRequest, DecideResponse, ErrorResponse, PairingRecord, PairingsResponse,
    RecommendationRecord, RecommendationsResponse,
};

/// Application state for matching endpoints.
#[derive(Clone)]
pub struct MatchesAppState {
    pub recommendations: Arc<RecommendationHandler>,
    pub decisions: Arc<DecisionHandler>,
    pub pairings: Arc<ListPairingsHandler>,
}

/// Get the ranked recommendation feed for the authenticated user.
///
/// GET /api/matches/recommendations
pub async fn get_recommendations(
    State(state): State<MatchesAppState>,
    RequireAuth(user): RequireAuth,
) -> impl IntoResponse {
    match state.recommendations.handle(user.id).await {
        Ok(candidates) => {
            let recommendations = candidates.iter().map(RecommendationRecord::from).collect();
            Json(RecommendationsResponse { recommendations }).into_response()
        }
        Err(e) => matching_error_response(e).into_response(),
    }
}

/// Record an accept or reject decision.
///
/// POST /api/matches/decision
pub async fn post_decision(
    State(state): State<MatchesAppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<DecideRequest>,
) -> impl IntoResponse {
    let kind: DecisionKind = match request.decision.parse() {
        Ok(kind) => kind,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Decision must be \"accept\" or \"reject\"".to_string(),
                    code: "INVALID_DECISION".to_string(),
                }),
            )
                .into_response();
        }
    };

    match state.decisions.handle(user.id, request.target_id, kind).await {
        Ok(outcome) => Json(DecideResponse {
            accepted: outcome.decision.is_accept(),
            paired: outcome.paired,
            pairing_id: outcome.pairing_id,
        })
        .into_response(),
        Err(e) => matching_error_response(e).into_response(),
    }
}

/// List the authenticated user's pairings, most recent first.
///
/// GET /api/matches
pub async fn list_pairings(
    State(state): State<MatchesAppState>,
    RequireAuth(user): RequireAuth,
) -> impl IntoResponse {
    match state.pairings.handle(user.id).await {
        Ok(views) => {
            let pairings = views.iter().map(PairingRecord::from).collect();
            Json(PairingsResponse { pairings }).into_response()
        }
        Err(e) => matching_error_response(e).into_response(),
    }
}

/// Map matching errors to HTTP status codes.
fn matching_error_response(e: MatchingError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &e {
        MatchingError::InvalidTarget => (StatusCode::BAD_REQUEST, "INVALID_TARGET"),
        MatchingError::ProfileNotFound(_) => (StatusCode::NOT_FOUND, "PROFILE_NOT_FOUND"),
        MatchingError::PairingNotFound(_) => (StatusCode::NOT_FOUND, "PAIRING_NOT_FOUND"),
        MatchingError::Store(msg) => {
            tracing::error!("Store failure while handling match request: {}", msg);
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
