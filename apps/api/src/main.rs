mod chat;
mod config;
mod errors;
mod explain;
mod llm_client;
mod routes;
mod sections;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::session::spawn_idle_sweeper;
use crate::config::Config;
use crate::llm_client::{LlmClient, ReqwestTransport};
use crate::routes::build_router;
use crate::sections::KeywordLineClassifier;
use crate::state::AppState;

const IDLE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; a missing API key is reported per request, not here
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResuBot API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize advisory client
    let transport = Arc::new(ReqwestTransport::new()?);
    let llm = LlmClient::new(
        config.deepseek_api_key.clone(),
        &config.deepseek_api_base,
        transport,
    );
    if llm.is_configured() {
        info!("LLM client initialized (model: {}, endpoint: {})", llm_client::MODEL, llm.endpoint());
    } else {
        warn!("DEEPSEEK_API_KEY is not set; chat questions will return a configuration message");
    }

    match config.chat_history_capacity {
        Some(cap) => info!("Chat history capped at {cap} turns per session"),
        None => info!("Chat history unbounded per session"),
    }

    // Build app state (KeywordLineClassifier by default)
    let state = AppState::new(&config, llm, Arc::new(KeywordLineClassifier));

    match config.session_idle_ttl {
        Some(ttl) => {
            info!("Idle sessions expire after {}s", ttl.as_secs());
            spawn_idle_sweeper(state.sessions.clone(), ttl.min(IDLE_SWEEP_INTERVAL));
        }
        None => info!("Idle session eviction disabled"),
    }

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
