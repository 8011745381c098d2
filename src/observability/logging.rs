//! Structured logging.
//!
//! Uses `tracing` with an `EnvFilter`; `RUST_LOG` overrides the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Binary targets that share the library's level.
const BINARY_TARGETS: [&str; 2] = ["sim_backend", "loadtest"];

/// Default filter directives for `level`. Other crates log at `warn`.
pub fn default_directives(level: &str) -> String {
    let mut directives = format!("warn,request_dispatcher={level},tower_http={level}");
    for target in BINARY_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

/// Install the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directives(level).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
