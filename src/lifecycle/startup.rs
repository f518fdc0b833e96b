//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Assemble the tier and bind its listener
//! - Serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{CascadeConfig, Tier};
use crate::http::server::{BuildError, HttpServer};
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::metrics;

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to assemble {tier} tier: {source}")]
    Build {
        tier: Tier,
        #[source]
        source: BuildError,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Run `tier` until `shutdown` fires.
pub async fn launch(tier: Tier, config: CascadeConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let address = config.bind_address(tier);
    let server = HttpServer::new(tier, config).map_err(|source| StartupError::Build { tier, source })?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address: address.clone(), source })?;
    tracing::info!(tier = %tier, address = %address, "Listening for connections");

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
