//! HTTP API handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use rps_duel_core::{
    Commitment, ErrorKind, Game, GameError, GameEvent, GameId, Move, Nonce, Outcome, Payout,
    PlayerId, Salt, TieChoice, TieOutcome,
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

pub const PLAYER_HEADER: &str = "X-Player-Id";

// ============ Errors ============

pub enum AppError {
    Game(GameError),
    MissingPlayer,
    BadRequest(String),
}

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        AppError::Game(err)
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::Phase | ErrorKind::Timing => StatusCode::CONFLICT,
        ErrorKind::CommitmentMismatch => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Transfer => StatusCode::BAD_GATEWAY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::Game(err) => {
                let kind = err.kind();
                if kind == ErrorKind::Internal {
                    tracing::error!("Internal error: {}", err);
                }
                (status_for(kind), Some(kind), err.to_string())
            }
            AppError::MissingPlayer => (
                StatusCode::UNAUTHORIZED,
                None,
                format!("Missing or invalid {} header", PLAYER_HEADER),
            ),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, None, message),
        };
        (
            status,
            Json(serde_json::json!({"error": message, "kind": kind})),
        )
            .into_response()
    }
}

fn player_from_headers(headers: &HeaderMap) -> Result<PlayerId, AppError> {
    headers
        .get(PLAYER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .ok_or(AppError::MissingPlayer)
}

// ============ Request/Response types ============

#[derive(Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: PlayerId,
    pub balance: u64,
}

#[derive(Deserialize)]
pub struct StakeRequest {
    pub commitment: Commitment,
    pub stake: u64,
}

#[derive(Serialize)]
pub struct CreateGameResponse {
    pub game_id: GameId,
}

#[derive(Deserialize)]
pub struct RecommitRequest {
    pub commitment: Commitment,
}

#[derive(Deserialize)]
pub struct RevealRequest {
    #[serde(rename = "move")]
    pub mv: Move,
    pub salt: Salt,
    pub nonce: Nonce,
}

#[derive(Serialize)]
pub struct RevealResponse {
    pub outcome: Option<Outcome>,
    pub game: Game,
}

#[derive(Deserialize)]
pub struct TieRequest {
    pub choice: TieChoice,
}

#[derive(Serialize)]
pub struct TieResponse {
    pub outcome: Option<TieOutcome>,
    pub game: Game,
}

#[derive(Serialize)]
pub struct ClaimResponse {
    pub winner: Option<PlayerId>,
    pub game: Game,
}

#[derive(Serialize)]
pub struct CancelResponse {
    pub refunds: Vec<Payout>,
    pub game: Game,
}

#[derive(Serialize)]
pub struct GamesResponse {
    pub games: Vec<Game>,
}

#[derive(Deserialize)]
pub struct EventsQuery {
    pub after: Option<usize>,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub events: Vec<GameEvent>,
    /// Cursor to pass as `after` on the next poll
    pub next: usize,
}

#[derive(Deserialize)]
pub struct TickRequest {
    pub seconds: i64,
}

#[derive(Serialize)]
pub struct TickResponse {
    pub now: DateTime<Utc>,
}

// ============ Account handlers ============

pub async fn register_account(State(state): State<AppState>) -> Json<AccountResponse> {
    let id = state.register_account();
    tracing::info!("Registered account {}", id);
    Json(AccountResponse {
        id,
        balance: state.balance(id),
    })
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, AppError> {
    let id: PlayerId = id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid account id: {}", id)))?;
    Ok(Json(AccountResponse {
        id,
        balance: state.balance(id),
    }))
}

// ============ Game handlers ============

pub async fn create_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<StakeRequest>,
) -> Result<Json<CreateGameResponse>, AppError> {
    let caller = player_from_headers(&headers)?;
    let game_id = state.arena().create(caller, req.commitment, req.stake)?;
    Ok(Json(CreateGameResponse { game_id }))
}

pub async fn list_open_games(State(state): State<AppState>) -> Json<GamesResponse> {
    let arena = state.arena();
    Json(GamesResponse {
        games: arena.open_games().into_iter().cloned().collect(),
    })
}

pub async fn list_my_games(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<GamesResponse>, AppError> {
    let caller = player_from_headers(&headers)?;
    let arena = state.arena();
    Ok(Json(GamesResponse {
        games: arena.games_for(caller).into_iter().cloned().collect(),
    }))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Game>, AppError> {
    let game = state.arena().get_game(GameId(id))?.clone();
    Ok(Json(game))
}

pub async fn join_game(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(req): Json<StakeRequest>,
) -> Result<Json<Game>, AppError> {
    let caller = player_from_headers(&headers)?;
    let mut arena = state.arena();
    arena.join(caller, GameId(id), req.commitment, req.stake)?;
    Ok(Json(arena.get_game(GameId(id))?.clone()))
}

pub async fn recommit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(req): Json<RecommitRequest>,
) -> Result<Json<Game>, AppError> {
    let caller = player_from_headers(&headers)?;
    let mut arena = state.arena();
    arena.recommit(caller, GameId(id), req.commitment)?;
    Ok(Json(arena.get_game(GameId(id))?.clone()))
}

pub async fn reveal(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(req): Json<RevealRequest>,
) -> Result<Json<RevealResponse>, AppError> {
    let caller = player_from_headers(&headers)?;
    let mut arena = state.arena();
    let outcome = arena.reveal(caller, GameId(id), req.mv, &req.salt, req.nonce)?;
    Ok(Json(RevealResponse {
        outcome,
        game: arena.get_game(GameId(id))?.clone(),
    }))
}

pub async fn handle_tie(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(req): Json<TieRequest>,
) -> Result<Json<TieResponse>, AppError> {
    let caller = player_from_headers(&headers)?;
    let mut arena = state.arena();
    let outcome = arena.handle_tie(caller, GameId(id), req.choice)?;
    Ok(Json(TieResponse {
        outcome,
        game: arena.get_game(GameId(id))?.clone(),
    }))
}

pub async fn cancel_game(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<CancelResponse>, AppError> {
    let caller = player_from_headers(&headers)?;
    let mut arena = state.arena();
    let refunds = arena.cancel(caller, GameId(id))?;
    Ok(Json(CancelResponse {
        refunds,
        game: arena.get_game(GameId(id))?.clone(),
    }))
}

pub async fn claim_timeout(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<ClaimResponse>, AppError> {
    let caller = player_from_headers(&headers)?;
    let mut arena = state.arena();
    let winner = arena.claim_after_reveal_timeout(caller, GameId(id))?;
    Ok(Json(ClaimResponse {
        winner,
        game: arena.get_game(GameId(id))?.clone(),
    }))
}

// ============ Observer / system handlers ============

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Json<EventsResponse> {
    let arena = state.arena();
    let log = arena.events();
    Json(EventsResponse {
        events: log.since(query.after.unwrap_or(0)).to_vec(),
        next: log.len(),
    })
}

pub async fn tick(
    State(state): State<AppState>,
    Json(req): Json<TickRequest>,
) -> Result<Json<TickResponse>, AppError> {
    let now = state
        .advance_time(req.seconds)
        .ok_or_else(|| {
            AppError::BadRequest("Simulated time is disabled (set SIMULATED_TIME=true)".to_string())
        })?
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    tracing::info!("Advanced simulated time by {}s to {}", req.seconds, now);
    Ok(Json(TickResponse { now }))
}

pub async fn get_time(State(state): State<AppState>) -> Json<TickResponse> {
    Json(TickResponse { now: state.now() })
}

pub async fn health() -> &'static str {
    "ok"
}
