// crates/server/src/lib.rs
//! Visora server library.
//!
//! This crate provides the Axum-based HTTP server for the visora backend.
//! Clients submit video generation jobs, receive a job id, and poll a status
//! endpoint until the simulated render completes.

pub mod config;
pub mod error;
pub mod jobs;
pub mod routes;
pub mod state;
pub mod uploads;

pub use config::Config;
pub use error::*;
pub use routes::api_routes;
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// GET / - Liveness probe.
async fn root() -> &'static str {
    "Visora AI Backend is running"
}

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - The root liveness probe and API routes (generate, status, health)
/// - A multipart body limit sized for voice sample uploads
/// - CORS for development (allows any origin)
/// - Request tracing
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(root))
        .merge(api_routes(state))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Integration Tests
// ============================================================================
