mod coach;
mod config;
mod db;
mod engine;
mod errors;
mod interview;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::coach::{Coach, FallbackCoach, HeuristicCoach, LlmCoach};
use crate::config::Config;
use crate::db::create_pool;
use crate::engine::tables::TemplateTables;
use crate::engine::Engine;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Template tables are loaded once and shared read-only
    let tables = Arc::new(TemplateTables::load(config.templates_path.as_deref())?);
    info!(
        "Template tables ready: {} vocabulary terms",
        tables.vocabulary.len()
    );

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Heuristic engine is always available; the LLM coach sits in front when configured
    let engine = Engine::new(tables.clone());
    let heuristic = HeuristicCoach::new(engine, config.engine_seed);
    let primary: Option<Arc<dyn Coach>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.llm_model.clone(), config.llm_timeout)?;
            info!("LLM coach enabled (model: {})", llm.model());
            Some(Arc::new(LlmCoach::new(llm, tables.clone())))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; running on the heuristic engine only");
            None
        }
    };
    let coach = Arc::new(FallbackCoach::new(primary, heuristic));

    let state = AppState {
        db,
        config: config.clone(),
        coach,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the web client's host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
