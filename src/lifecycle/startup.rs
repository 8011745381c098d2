//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Install the metrics exporter when enabled
//! - Build the pool and dispatcher, then bind the listener
//! - Serve until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and happens before traffic
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::validation::describe;
use crate::config::{validate_config, DispatcherConfig, ValidationError};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::load_balancer::PoolError;
use crate::observability::metrics;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {}", describe(.0))]
    Config(Vec<ValidationError>),

    #[error("failed to build backend pool: {0}")]
    Pool(#[from] PoolError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Start the dispatcher and block until it shuts down.
pub async fn run(config: DispatcherConfig) -> Result<(), StartupError> {
    validate_config(&config).map_err(StartupError::Config)?;

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr);
        }
    }

    let server = HttpServer::new(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let signals = shutdown.trigger_on_signal();

    let result = server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve);

    signals.abort();
    result
}
