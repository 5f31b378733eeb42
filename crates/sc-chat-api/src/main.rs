//! ShopClerk Chat API — grounded product Q&A REST server.
//!
//! Pipeline per chat request: extract a typed intent from the message,
//! resolve it against a fresh catalog snapshot, synthesize an answer
//! grounded in the resolved facts.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use sc_chat_api::config::ApiConfig;
use sc_chat_api::routes;
use sc_chat_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sc-chat-api starting");

    // Missing LLM credentials stop startup here, not on the first request.
    let config = ApiConfig::from_env()?;

    let state = AppState::from_config(&config);
    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
