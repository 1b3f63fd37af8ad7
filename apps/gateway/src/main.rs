//! Webhook gateway bridging the Comapi Chat API and the Meya bot platform.
//!
//! Exposes `POST /botInbound` for chat events heading to the bot and
//! `POST /botOutbound` for bot events heading back into the chat. Each
//! request is verified, translated and forwarded statelessly.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use cmb_core::BridgeConfig;
use tracing_subscriber::EnvFilter;

mod app;
mod clients;

use app::AppState;
use clients::{ComapiClient, MeyaClient};

/// Fixed per-call timeout on downstream HTTP requests.
const DOWNSTREAM_TIMEOUT: Duration = Duration::from_secs(130);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BridgeConfig::from_env()?;
    let http = reqwest::Client::builder()
        .timeout(DOWNSTREAM_TIMEOUT)
        .build()?;

    let state = AppState {
        bot: Arc::new(MeyaClient::new(http.clone(), &config)),
        chat: Arc::new(ComapiClient::new(http, &config)),
        config: Arc::new(config),
    };
    let app = app::router(state);

    let addr: std::net::SocketAddr = std::env::var("BIND")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()?;
    tracing::info!("bridge gateway listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
