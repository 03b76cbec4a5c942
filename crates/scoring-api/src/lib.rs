//! Scoring API
//!
//! HTTP front end of the scoring service. A request body flows through the
//! [`pipeline::Pipeline`]: envelope validation, token authentication, then
//! the method router, which validates the method's own arguments and calls
//! the store.

#![warn(missing_docs)]

pub mod auth;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod response;
pub mod telemetry;

pub use error::{ApiError, ServerError};

use config::ScoringConfig;
use handlers::{create_router, AppState};
use pipeline::Pipeline;
use scoring_store::SqliteStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Start the scoring HTTP server
///
/// Opens the store, builds the pipeline and serves until Ctrl-C.
/// Logging must already be initialized (see [`telemetry::init`]).
pub async fn start_server(config: ScoringConfig) -> Result<(), ServerError> {
    info!("Starting scoring API");
    info!("Bind address: {}", config.bind_addr());
    info!("Store: {}", config.store.path.display());

    let store = SqliteStore::with_options(&config.store.path, config.store.options())?;
    let pipeline = Arc::new(Pipeline::from_config(&config, store));
    let app = create_router(AppState::new(pipeline));

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Scoring API listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    info!("Scoring API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
