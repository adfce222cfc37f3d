// crates/server/src/main.rs
//! Visora backend binary.
//!
//! Binds the HTTP server, serves until interrupted, then aborts any
//! simulator tasks still running.

use std::net::SocketAddr;

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use visora_server::{create_app, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env();
    let state = AppState::new(config.clone());
    let app = create_app(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(port = config.port, "Visora backend listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // In-flight jobs are lost on restart anyway; stop their simulators so
    // shutdown doesn't strand background tasks.
    state.simulators.abort_all();
    tracing::info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
