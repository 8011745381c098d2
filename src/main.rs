//! HTTP request dispatcher.
//!
//! Spreads every inbound request over a fixed pool of backends using
//! round-robin or random selection, and relays the backend's response.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────┐
//!                     │                  DISPATCHER                   │
//!   Client Request    │  ┌─────────┐   ┌────────────┐   ┌──────────┐  │
//!   ──────────────────┼─▶│  http   │──▶│ dispatcher │──▶│   pool   │  │
//!                     │  │ server  │   │            │   │ strategy │  │
//!                     │  └─────────┘   └─────┬──────┘   └──────────┘  │
//!                     │                      │ alive?                 │
//!                     │            no ◀──────┴──────▶ yes             │
//!                     │            503                │               │
//!   Client Response   │                       ┌───────▼───────┐       │
//!   ◀─────────────────┼───────────────────────│   forwarder   │◀──────┼─── Backend
//!                     │                       └───────────────┘       │
//!                     └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use request_dispatcher::config::{load_config, BackendConfig, DispatcherConfig};
use request_dispatcher::lifecycle;
use request_dispatcher::observability::logging;

#[derive(Parser)]
#[command(name = "request-dispatcher")]
#[command(about = "Distribute HTTP requests over a fixed pool of backends", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the selection strategy (round_robin, random).
    #[arg(short, long)]
    strategy: Option<String>,

    /// Replace the backend list; repeat for each backend.
    #[arg(long = "backend", value_name = "URL")]
    backends: Vec<String>,

    /// Override the log level.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<DispatcherConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => DispatcherConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if !self.backends.is_empty() {
            config.backends = self.backends.into_iter().map(BackendConfig::new).collect();
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;
    logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        strategy = %config.strategy,
        backends = config.backends.len(),
        "request-dispatcher v0.1.0 starting"
    );

    if let Err(e) = lifecycle::run(config).await {
        tracing::error!(error = %e, "Dispatcher failed");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
