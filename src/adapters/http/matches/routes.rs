//! Axum router configuration for matching endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_recommendations, list_pairings, post_decision, MatchesAppState};

/// Create the matching API router.
///
/// # Routes
///
/// - `GET /` - Current pairings for the authenticated user
/// - `GET /recommendations` - Ranked partner candidates
/// - `POST /decision` - Record an accept or reject
///
/// Mount at `/api/matches`. The realtime `/live` route is wired
/// separately because it carries its own WebSocket state.
pub fn matches_router() -> Router<MatchesAppState> {
    Router::new()
        .route("/", get(list_pairings))
        .route("/recommendations", get(get_recommendations))
        .route("/decision", post(post_decision))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::memory::{
        InMemoryDecisionLedger, InMemoryPairingStore, InMemoryProfileStore,
    };
    use crate::adapters::websocket::{ChannelRegistry, RoomRegistry, WsNotifier};
    use crate::application::{DecisionHandler, ListPairingsHandler, RecommendationHandler};

    #[test]
    fn matches_router_creates_routes() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let ledger = Arc::new(InMemoryDecisionLedger::new());
        let pairings = Arc::new(InMemoryPairingStore::new());
        let notifier = Arc::new(WsNotifier::new(
            Arc::new(ChannelRegistry::with_default_capacity()),
            Arc::new(RoomRegistry::with_default_capacity()),
        ));

        let state = MatchesAppState {
            recommendations: Arc::new(RecommendationHandler::new(
                profiles.clone(),
                ledger.clone(),
            )),
            decisions: Arc::new(DecisionHandler::new(
                ledger,
                pairings.clone(),
                profiles.clone(),
                notifier,
            )),
            pairings: Arc::new(ListPairingsHandler::new(pairings, profiles)),
        };

        let _: Router<()> = matches_router().with_state(state);
    }
}
