//! Simulated backend.
//!
//! A stand-in upstream that sleeps for `?delay=<ms>` (default 5 ms) and then
//! answers 200 with a body naming its port. Used to load the dispatcher with
//! controllable latency.

use std::time::Duration;

use axum::{
    extract::{Query, State},
    routing::any,
    Router,
};

/// Delay applied when the query omits one or it does not parse.
pub const DEFAULT_DELAY_MS: u64 = 5;

#[derive(Debug, Default)]
pub struct DelayParams {
    delay: Option<String>,
}

impl DelayParams {
    /// Pick the first `delay` pair; repeats are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let delay = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "delay").then_some(value));
        Self { delay }
    }

    /// Requested delay in milliseconds.
    pub fn delay_ms(&self) -> u64 {
        self.delay
            .as_deref()
            .and_then(|d| d.trim().parse().ok())
            .unwrap_or(DEFAULT_DELAY_MS)
    }
}

/// Router answering every method and path for the backend on `port`.
pub fn router(port: u16) -> Router {
    Router::new()
        .route("/{*path}", any(delayed_reply))
        .route("/", any(delayed_reply))
        .with_state(port)
}

async fn delayed_reply(
    State(port): State<u16>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> String {
    let delay_ms = DelayParams::from_pairs(pairs).delay_ms();
    tracing::info!(port, delay_ms, "Backend received request");
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    format!(
        "Hello from Backend Server on port {}! Processed in {}ms.\n",
        port, delay_ms
    )
}
