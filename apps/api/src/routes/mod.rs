pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/skills", get(handlers::handle_list_skills))
        .route("/api/v1/extract", post(handlers::handle_extract))
        .route("/api/v1/match", post(handlers::handle_match))
        .route("/api/v1/compliance", post(handlers::handle_compliance))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/analyze/upload", post(handlers::handle_upload))
        .route("/api/v1/report", post(handlers::handle_report))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
