//! Horror Oracle HTTP server.
//!
//! Reads `OracleConfig` from the environment (and `.env`), then serves the
//! API until interrupted. `RUST_LOG` overrides the default log filter.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use server::OracleConfig;

const DEFAULT_LOG_FILTER: &str = "info,server=debug,sources=debug,oracle=debug";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = OracleConfig::from_env()?;
    server::serve(config).await
}
