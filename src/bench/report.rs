//! Aggregation of one scenario's results.

use std::time::Duration;

use serde::Serialize;

/// Outcome of a single request.
#[derive(Debug, Clone, Copy)]
pub struct RequestResult {
    pub latency: Duration,
    pub successful: bool,
}

/// Summary statistics for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub target_rps: u32,
    pub duration_secs: f64,
    pub total_requests: usize,
    pub successful_requests: usize,
    pub achieved_rps: f64,
    /// Percentage of requests answered 200.
    pub availability: f64,
    /// P99 latency in milliseconds, over successful requests only.
    pub p99_latency_ms: f64,
}

impl ScenarioReport {
    /// Summarise `results`. `None` when nothing was sent.
    pub fn from_results(
        target_rps: u32,
        duration: Duration,
        results: &[RequestResult],
    ) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        let total = results.len();
        let mut latencies: Vec<f64> = results
            .iter()
            .filter(|r| r.successful)
            .map(|r| r.latency.as_millis() as f64)
            .collect();
        let successful = latencies.len();

        latencies.sort_by(|a, b| a.total_cmp(b));

        Some(Self {
            target_rps,
            duration_secs: duration.as_secs_f64(),
            total_requests: total,
            successful_requests: successful,
            achieved_rps: total as f64 / duration.as_secs_f64(),
            availability: successful as f64 / total as f64 * 100.0,
            p99_latency_ms: percentile(&latencies, 0.99),
        })
    }
}

/// Value at `floor(q * n)`, clamped to the last element. `sorted` must be ascending.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((q * sorted.len() as f64) as usize).min(sorted.len() - 1);
    sorted[idx]
}

/// One point on a chart: target RPS on x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The three series a full run plots.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Series {
    pub p99_latency_ms: Vec<Point>,
    pub achieved_rps: Vec<Point>,
    pub availability: Vec<Point>,
}

impl Series {
    pub fn push(&mut self, report: &ScenarioReport) {
        let x = report.target_rps as f64;
        self.p99_latency_ms.push(Point { x, y: report.p99_latency_ms });
        self.achieved_rps.push(Point { x, y: report.achieved_rps });
        self.availability.push(Point { x, y: report.availability });
    }
}
