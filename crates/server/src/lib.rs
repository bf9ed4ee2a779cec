//! Server crate for the Horror Oracle.
//!
//! - `config`: environment-driven `OracleConfig`
//! - `orchestrator`: `OracleService`, the request flow over every backend
//! - `routes`: the axum router that exposes the service over HTTP

pub mod config;
pub mod orchestrator;
pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

pub use config::{ConfigError, OracleConfig};
pub use orchestrator::{AskResponse, GenrePick, OracleService, ServiceError};
pub use routes::{router, ApiError};

/// Build the service from `config` and serve it until Ctrl-C
pub async fn serve(config: OracleConfig) -> Result<()> {
    let service = Arc::new(OracleService::from_config(&config)?);
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    info!("Horror Oracle listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Horror Oracle shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
