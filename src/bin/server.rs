use std::sync::Arc;

use arena_combat_bot::cache::{FileCache, LeaderboardCache, MemoryCache};
use arena_combat_bot::config::{log_filter, BotConfig};
use arena_combat_bot::constants::BANNER;
use arena_combat_bot::engine::DecisionEngine;
use arena_combat_bot::events::{TurnEventProcessor, TurnPublisher};
use arena_combat_bot::leaderboard_store::fetch_document;
use arena_combat_bot::metrics::{
    FanoutScoreSink, LastValueScoreSink, ScoreSink, TracingScoreSink,
};
use arena_combat_bot::service::TurnService;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
    turns: TurnService,
    cache: Arc<dyn LeaderboardCache>,
    scores: Arc<LastValueScoreSink>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref(), "info"))
        .init();

    let config = BotConfig::from_env();
    let cache: Arc<dyn LeaderboardCache> = match &config.leaderboard_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "using file leaderboard cache");
            Arc::new(FileCache::new(dir.clone()))
        }
        None => {
            info!("using in-memory leaderboard cache");
            Arc::new(MemoryCache::new())
        }
    };

    let scores = Arc::new(LastValueScoreSink::new());
    let sink: Arc<dyn ScoreSink> = Arc::new(FanoutScoreSink::new(vec![
        scores.clone() as Arc<dyn ScoreSink>,
        Arc::new(TracingScoreSink) as Arc<dyn ScoreSink>,
    ]));
    let (publisher, rx) = TurnPublisher::channel(config.event_queue_capacity);
    TurnEventProcessor::new(cache.clone(), sink).spawn(rx);

    let state = AppState {
        turns: TurnService::new(
            DecisionEngine::new(config.engine),
            cache.clone(),
            Some(publisher),
            config.leaderboard_max_age_ms,
        ),
        cache,
        scores,
    };

    let app = router(state);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind server socket");

    info!(port = config.port, engine = ?config.engine, "listening");
    axum::serve(listener, app)
        .await
        .expect("server runtime failed");
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(banner).post(play_handler))
        .route("/healthz", get(healthz))
        .route("/api/leaderboard", get(leaderboard_handler))
        .route("/api/scores", get(scores_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn banner() -> &'static str {
    BANNER
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn play_handler(State(state): State<AppState>, body: String) -> Response {
    match state.turns.handle_turn(&body) {
        Ok(decision) => decision.action.token().into_response(),
        Err(error) => {
            warn!(%error, "rejecting turn request");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response()
        }
    }
}

async fn leaderboard_handler(State(state): State<AppState>) -> Response {
    match fetch_document(&*state.cache) {
        Ok(document) => Json(document).into_response(),
        Err(error) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

async fn scores_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.scores.snapshot())
}
