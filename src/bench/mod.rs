//! Load-testing harness.
//!
//! # Data Flow
//! ```text
//! Scenario (rps, duration)
//!     → runner.rs (interval ticks, one GET per tick, results from the JoinSet)
//!     → report.rs (throughput, availability, P99 latency)
//!     → Series (target RPS vs. each metric) → JSON on disk
//! ```
//!
//! A black-box client: it only talks HTTP to the dispatcher's listener.

pub mod report;
pub mod runner;

pub use report::{RequestResult, ScenarioReport, Series};
pub use runner::{default_scenarios, run_and_report, run_scenario, Scenario};
