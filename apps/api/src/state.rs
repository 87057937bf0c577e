use std::sync::Arc;

use sqlx::PgPool;

use crate::coach::FallbackCoach;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// LLM coach (when configured) backed by the heuristic engine.
    pub coach: Arc<FallbackCoach>,
}
