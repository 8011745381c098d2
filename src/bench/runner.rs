//! Fixed-rate request generation.

use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::task::JoinSet;
use tokio::time::{self, MissedTickBehavior};

use crate::bench::report::{RequestResult, ScenarioReport};

/// A target request rate held for a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub rps: u32,
    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl Scenario {
    pub fn new(rps: u32, duration: Duration) -> Self {
        Self { rps, duration }
    }

    /// Interval between two request starts.
    pub fn period(&self) -> Duration {
        Duration::from_secs(1) / self.rps.max(1)
    }
}

/// The default ladder: 10 → 10 000 RPS, ten seconds each.
pub fn default_scenarios() -> Vec<Scenario> {
    [10, 50, 100, 200, 300, 500, 1000, 2000, 3000, 5000, 10000]
        .into_iter()
        .map(|rps| Scenario::new(rps, Duration::from_secs(10)))
        .collect()
}

/// Fire GETs at `url` at the scenario's rate, then wait for stragglers.
pub async fn run_scenario(
    client: &reqwest::Client,
    url: &str,
    scenario: Scenario,
) -> Vec<RequestResult> {
    let mut in_flight = JoinSet::new();

    let mut ticker = time::interval(scenario.period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
    let deadline = time::sleep(scenario.duration);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = ticker.tick() => {
                let client = client.clone();
                let url = url.to_string();
                in_flight.spawn(async move { send_one(&client, &url).await });
            }
        }
    }

    let mut results = Vec::with_capacity(in_flight.len());
    while let Some(joined) = in_flight.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => tracing::warn!(error = %e, "Request task failed"),
        }
    }
    results
}

async fn send_one(client: &reqwest::Client, url: &str) -> RequestResult {
    let start = Instant::now();
    let outcome = client.get(url).send().await;
    let latency = start.elapsed();

    let successful = match outcome {
        Ok(res) if res.status() == reqwest::StatusCode::OK => true,
        Ok(res) => {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(url, status = %status, body = %body.trim_end(), "Request failed");
            false
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "Request failed");
            false
        }
    };

    RequestResult { latency, successful }
}

/// Run a scenario and summarise it.
pub async fn run_and_report(
    client: &reqwest::Client,
    url: &str,
    scenario: Scenario,
) -> Option<ScenarioReport> {
    let results = run_scenario(client, url, scenario).await;
    ScenarioReport::from_results(scenario.rps, scenario.duration, &results)
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}
