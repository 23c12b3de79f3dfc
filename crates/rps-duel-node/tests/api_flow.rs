//! In-process tests for the HTTP surface.
//!
//! Requests go straight through the router with `oneshot`; no socket is bound.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use rps_duel_core::{Commitment, Move, Nonce, PlayerId, Salt};
use rps_duel_node::{config::NodeConfig, handlers::PLAYER_HEADER, router, state::AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

const STAKE: u64 = 1_000;
const BALANCE: u64 = 10_000;

struct Hand {
    mv: Move,
    salt: Salt,
    nonce: Nonce,
}

impl Hand {
    fn new(mv: Move) -> Self {
        Self {
            mv,
            salt: Salt::random(),
            nonce: Nonce::random(),
        }
    }

    fn commitment(&self) -> Commitment {
        Commitment::new(self.mv, &self.salt, self.nonce)
    }

    fn reveal_body(&self) -> Value {
        json!({
            "move": self.mv,
            "salt": self.salt,
            "nonce": self.nonce,
        })
    }
}

fn app(simulated_time: bool) -> Router {
    let config = NodeConfig {
        simulated_time,
        ..NodeConfig::default()
    };
    router(AppState::new(&config))
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    player: Option<PlayerId>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(player) = player {
        builder = builder.header(PLAYER_HEADER, player.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &Router) -> PlayerId {
    let (status, body) = call(app, "POST", "/api/accounts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], BALANCE);
    serde_json::from_value(body["id"].clone()).unwrap()
}

async fn balance(app: &Router, player: PlayerId) -> u64 {
    let (_, body) = call(app, "GET", &format!("/api/accounts/{}", player), None, None).await;
    body["balance"].as_u64().unwrap()
}

async fn open_game(app: &Router, p1: PlayerId, p2: PlayerId, a: &Hand, b: &Hand) -> u64 {
    let (status, body) = call(
        app,
        "POST",
        "/api/games",
        Some(p1),
        Some(json!({"commitment": a.commitment(), "stake": STAKE})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["game_id"].as_u64().unwrap();

    let (status, body) = call(
        app,
        "POST",
        &format!("/api/games/{}/join", id),
        Some(p2),
        Some(json!({"commitment": b.commitment(), "stake": STAKE})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "revealing");
    id
}

#[tokio::test]
async fn test_health() {
    let app = app(false);
    let response = app
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_full_game_winner_paid() {
    let app = app(false);
    let p1 = register(&app).await;
    let p2 = register(&app).await;
    let rock = Hand::new(Move::Rock);
    let scissors = Hand::new(Move::Scissors);
    let id = open_game(&app, p1, p2, &rock, &scissors).await;

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/games/{}/reveal", id),
        Some(p1),
        Some(rock.reveal_body()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], Value::Null);

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/games/{}/reveal", id),
        Some(p2),
        Some(scissors.reveal_body()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "first_wins");
    assert_eq!(body["game"]["status"], "completed");

    assert_eq!(balance(&app, p1).await, BALANCE + STAKE);
    assert_eq!(balance(&app, p2).await, BALANCE - STAKE);

    let (_, body) = call(&app, "GET", "/api/events", None, None).await;
    let types: Vec<&str> = body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        types,
        vec![
            "game_created",
            "game_joined",
            "game_revealed",
            "game_revealed",
            "game_resolved"
        ]
    );
    assert_eq!(body["next"], 5);

    let (_, body) = call(&app, "GET", "/api/events?after=4", None, None).await;
    assert_eq!(body["events"].as_array().unwrap().len(), 1);
    assert_eq!(body["events"][0]["winner"], p1.to_string());
}

#[tokio::test]
async fn test_rejections_map_to_status_codes() {
    let app = app(false);
    let p1 = register(&app).await;
    let p2 = register(&app).await;
    let hand = Hand::new(Move::Paper);

    let (status, _) = call(
        &app,
        "POST",
        "/api/games",
        None,
        Some(json!({"commitment": hand.commitment(), "stake": STAKE})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(
        &app,
        "POST",
        "/api/games",
        Some(p1),
        Some(json!({"commitment": hand.commitment(), "stake": STAKE + 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");

    let (_, body) = call(
        &app,
        "POST",
        "/api/games",
        Some(p1),
        Some(json!({"commitment": hand.commitment(), "stake": STAKE})),
    )
    .await;
    let id = body["game_id"].as_u64().unwrap();

    // Reveal before anyone joined.
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/games/{}/reveal", id),
        Some(p1),
        Some(hand.reveal_body()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "phase");

    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/games/{}/cancel", id),
        Some(p2),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, "GET", "/api/games/99", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let joiner_hand = Hand::new(Move::Rock);
    call(
        &app,
        "POST",
        &format!("/api/games/{}/join", id),
        Some(p2),
        Some(json!({"commitment": joiner_hand.commitment(), "stake": STAKE})),
    )
    .await;
    let liar = Hand {
        mv: Move::Scissors,
        salt: joiner_hand.salt.clone(),
        nonce: joiner_hand.nonce,
    };
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/games/{}/reveal", id),
        Some(p2),
        Some(liar.reveal_body()),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "commitment_mismatch");

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/games/{}/claim-timeout", id),
        Some(p1),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "timing");
}

#[tokio::test]
async fn test_timeout_claim_with_simulated_time() {
    let app = app(true);
    let p1 = register(&app).await;
    let p2 = register(&app).await;
    let a = Hand::new(Move::Paper);
    let b = Hand::new(Move::Rock);
    let id = open_game(&app, p1, p2, &a, &b).await;

    call(
        &app,
        "POST",
        &format!("/api/games/{}/reveal", id),
        Some(p2),
        Some(b.reveal_body()),
    )
    .await;

    let tick = json!({ "seconds": 121 });
    let (status, _) = call(&app, "POST", "/api/system/tick", None, Some(tick)).await;
    assert_eq!(status, StatusCode::OK);

    let bystander = register(&app).await;
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/games/{}/claim-timeout", id),
        Some(bystander),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["winner"], p2.to_string());
    assert_eq!(balance(&app, p2).await, BALANCE + STAKE);
    assert_eq!(balance(&app, p1).await, BALANCE - STAKE);
}

#[tokio::test]
async fn test_tick_disabled_on_wall_clock() {
    let app = app(false);
    let tick = json!({ "seconds": 5 });
    let (status, _) = call(&app, "POST", "/api/system/tick", None, Some(tick)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tick_rejects_rewind_and_overflow() {
    let app = app(true);
    let (_, before) = call(&app, "GET", "/api/system/time", None, None).await;

    for seconds in [-3600, i64::MAX] {
        let (status, body) = call(
            &app,
            "POST",
            "/api/system/tick",
            None,
            Some(json!({ "seconds": seconds })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    let (_, after) = call(&app, "GET", "/api/system/time", None, None).await;
    assert_eq!(before["now"], after["now"]);
}

#[tokio::test]
async fn test_tie_rematch_over_http() {
    let app = app(false);
    let p1 = register(&app).await;
    let p2 = register(&app).await;
    let a = Hand::new(Move::Scissors);
    let b = Hand::new(Move::Scissors);
    let id = open_game(&app, p1, p2, &a, &b).await;

    for (player, hand) in [(p1, &a), (p2, &b)] {
        let (status, _) = call(
            &app,
            "POST",
            &format!("/api/games/{}/reveal", id),
            Some(player),
            Some(hand.reveal_body()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/games/{}/tie", id),
        Some(p1),
        Some(json!({"choice": "none"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");

    call(
        &app,
        "POST",
        &format!("/api/games/{}/tie", id),
        Some(p1),
        Some(json!({"choice": "rematch"})),
    )
    .await;
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/games/{}/tie", id),
        Some(p2),
        Some(json!({"choice": "rematch"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["kind"], "rematch");
    assert_eq!(body["game"]["status"], "waiting");
    assert_eq!(body["game"]["round"], 2);

    // A rematch is not listed as open for new opponents.
    let (_, body) = call(&app, "GET", "/api/games/open", None, None).await;
    assert!(body["games"].as_array().unwrap().is_empty());

    let a2 = Hand::new(Move::Rock);
    let b2 = Hand::new(Move::Paper);
    call(
        &app,
        "POST",
        &format!("/api/games/{}/recommit", id),
        Some(p1),
        Some(json!({"commitment": a2.commitment()})),
    )
    .await;
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/games/{}/recommit", id),
        Some(p2),
        Some(json!({"commitment": b2.commitment()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "revealing");

    let (_, body) = call(&app, "GET", "/api/games/mine", Some(p1), None).await;
    assert_eq!(body["games"].as_array().unwrap().len(), 1);
}
