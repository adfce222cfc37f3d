//! API route handlers for the visora server.

pub mod generate;
pub mod health;
pub mod status;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - POST /api/generate - Queue a video generation job
/// - GET /api/status/{job_id} - Poll a job's progress
/// - GET /api/health - Health check
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", generate::router())
        .nest("/api", status::router())
        .with_state(state)
}
