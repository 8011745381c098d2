//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher decisions
//!     → logging.rs (structured log events: backend, index, strategy, request ID)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout log stream
//!     → Metrics endpoint (Prometheus scrape)
//!     → the load-test harness, reading logs to interpret results
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the inbound request into every dispatch log line
//! - Metrics are cheap (atomic increments) and off unless configured

pub mod logging;
pub mod metrics;
