//! RPS Duel Node
//!
//! Serves the duel arena over HTTP.

use rps_duel_node::{config::NodeConfig, router, state::AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = NodeConfig::from_env()?;
    tracing::info!(
        "Stake {} per side, reveal window {}s, tie window {}s",
        config.game.stake,
        config.game.reveal_window.num_seconds(),
        config.game.tie_window.num_seconds()
    );
    if config.simulated_time {
        tracing::info!("Simulated time enabled; advance it with POST /api/system/tick");
    }

    let app = router(AppState::new(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Duel node listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
