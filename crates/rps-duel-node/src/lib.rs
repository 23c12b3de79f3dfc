//! RPS Duel Node
//!
//! HTTP front end for a single arena. Requests are applied one at a time
//! under a single lock, standing in for a serializing ledger.

pub mod config;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use handlers::*;
use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        // Accounts
        .route("/api/accounts", post(register_account))
        .route("/api/accounts/:id", get(get_account))
        // Games
        .route("/api/games", post(create_game))
        .route("/api/games/open", get(list_open_games))
        .route("/api/games/mine", get(list_my_games))
        .route("/api/games/:id", get(get_game))
        .route("/api/games/:id/join", post(join_game))
        .route("/api/games/:id/recommit", post(recommit))
        .route("/api/games/:id/reveal", post(reveal))
        .route("/api/games/:id/tie", post(handle_tie))
        .route("/api/games/:id/cancel", post(cancel_game))
        .route("/api/games/:id/claim-timeout", post(claim_timeout))
        // Observers
        .route("/api/events", get(list_events))
        // System
        .route("/api/system/time", get(get_time))
        .route("/api/system/tick", post(tick))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
