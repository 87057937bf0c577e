pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/interviews", post(handlers::handle_create_interview))
        .route("/api/v1/interviews/:id", get(handlers::handle_get_interview))
        .route(
            "/api/v1/interviews/:id/answers",
            post(handlers::handle_submit_answer),
        )
        .route(
            "/api/v1/interviews/:id/report",
            post(handlers::handle_generate_report),
        )
        .with_state(state)
}
