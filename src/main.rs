//! Spottr engine server binary.
//!
//! Wires the Postgres stores, the realtime registries and the application
//! handlers together, then serves the REST and WebSocket API.

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Json, Router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use spottr_engine::adapters::auth::{JwtConfig, JwtSessionValidator};
use spottr_engine::adapters::http::middleware::{auth_middleware, AuthState};
use spottr_engine::adapters::http::{chat_router, matches_router, ChatAppState, MatchesAppState};
use spottr_engine::adapters::postgres::{
    PostgresDecisionLedger, PostgresMessageStore, PostgresPairingStore, PostgresProfileStore,
};
use spottr_engine::adapters::websocket::{
    ws_handler, ChannelRegistry, RoomRegistry, WsNotifier, WsState,
};
use spottr_engine::application::{
    ChatHistoryHandler, DecisionHandler, ListPairingsHandler, PostMessageHandler,
    RecommendationHandler,
};
use spottr_engine::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    tracing::info!("Starting spottr engine");

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    // Stores
    let profiles = Arc::new(PostgresProfileStore::new(pool.clone()));
    let ledger = Arc::new(PostgresDecisionLedger::new(pool.clone()));
    let pairings = Arc::new(PostgresPairingStore::new(pool.clone()));
    let messages = Arc::new(PostgresMessageStore::new(pool));

    // Realtime registries and notifier
    let channels = Arc::new(ChannelRegistry::with_default_capacity());
    let rooms = Arc::new(RoomRegistry::with_default_capacity());
    let notifier = Arc::new(WsNotifier::new(channels.clone(), rooms.clone()));

    // Application handlers
    let recommendations = Arc::new(RecommendationHandler::new(profiles.clone(), ledger.clone()));
    let decisions = Arc::new(DecisionHandler::new(
        ledger,
        pairings.clone(),
        profiles.clone(),
        notifier.clone(),
    ));
    let pairing_list = Arc::new(ListPairingsHandler::new(pairings.clone(), profiles));
    let post_message = Arc::new(PostMessageHandler::new(
        pairings.clone(),
        messages.clone(),
        notifier,
    ));
    let history = Arc::new(ChatHistoryHandler::new(pairings.clone(), messages));

    let matches_state = MatchesAppState {
        recommendations,
        decisions,
        pairings: pairing_list,
    };
    let chat_state = ChatAppState {
        post_message: post_message.clone(),
        history,
    };
    let ws_state = WsState::new(channels, rooms, pairings, post_message);

    let validator: AuthState = Arc::new(JwtSessionValidator::new(&JwtConfig::new(
        config.auth.jwt_secret.clone(),
    )));

    let app = Router::new()
        .nest("/api/matches", matches_router().with_state(matches_state))
        .nest("/api/chat", chat_router().with_state(chat_state))
        .route("/api/matches/live", get(ws_handler).with_state(ws_state))
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(validator, auth_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                ))),
        );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the CORS layer from configured origins.
///
/// No configured origins means permissive, which is only sensible in
/// development; production deployments set `SPOTTR__SERVER__CORS_ORIGINS`.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let parsed: Vec<_> = origins
        .iter()
        .filter_map(|o| o.parse::<http::HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
