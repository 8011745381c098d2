use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use request_dispatcher::bench::{default_scenarios, run_and_report, Scenario, Series};
use request_dispatcher::observability::logging;

#[derive(Parser)]
#[command(name = "loadtest")]
#[command(about = "Drive the dispatcher at fixed request rates and report latency and availability", long_about = None)]
struct Cli {
    /// Dispatcher URL.
    #[arg(short, long, default_value = "http://localhost:8000")]
    target: String,

    /// Target rates; defaults to the 10 → 10000 RPS ladder.
    #[arg(long, value_delimiter = ',')]
    rps: Vec<u32>,

    /// Seconds per scenario.
    #[arg(short, long, default_value_t = 10)]
    duration_secs: u64,

    /// Where to write the chart series as JSON.
    #[arg(short, long, default_value = "images/results.json")]
    output: PathBuf,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let duration = Duration::from_secs(cli.duration_secs);
    let scenarios: Vec<Scenario> = if cli.rps.is_empty() {
        default_scenarios()
            .into_iter()
            .map(|s| Scenario::new(s.rps, duration))
            .collect()
    } else {
        cli.rps.iter().map(|&rps| Scenario::new(rps, duration)).collect()
    };

    let client = reqwest::Client::new();
    let mut series = Series::default();
    let mut reports = Vec::new();

    for scenario in scenarios {
        println!(
            "\n--- Running Test Scenario: RPS = {}, Duration = {:?} ---",
            scenario.rps, scenario.duration
        );

        let Some(report) = run_and_report(&client, &cli.target, scenario).await else {
            println!("No requests were made in this scenario.");
            continue;
        };

        println!("  Total Requests: {}", report.total_requests);
        println!("  Successful Requests: {}", report.successful_requests);
        println!("  Achieved RPS: {:.2}", report.achieved_rps);
        println!("  Availability: {:.2}%", report.availability);
        println!("  P99 Latency: {:.2} ms", report.p99_latency_ms);

        series.push(&report);
        reports.push(report);
    }

    if let Some(dir) = cli.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::json!({ "scenarios": reports, "series": series });
    std::fs::write(&cli.output, serde_json::to_string_pretty(&json)?)?;

    println!("\nTesting complete. Results saved to {}", cli.output.display());
    Ok(())
}
