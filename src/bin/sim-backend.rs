use std::net::SocketAddr;

use clap::Parser;
use request_dispatcher::observability::logging;
use request_dispatcher::simulator;

#[derive(Parser)]
#[command(name = "sim-backend")]
#[command(about = "Simulated backend that sleeps for ?delay=<ms> before answering", long_about = None)]
struct Cli {
    /// Port to listen on.
    #[arg(default_value_t = 8080)]
    port: u16,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Backend server listening");

    axum::serve(listener, simulator::router(cli.port)).await?;
    Ok(())
}
