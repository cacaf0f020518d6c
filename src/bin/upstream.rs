//! Upstream echo service.

use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use otel_gateway::config::ObservabilityConfig;
use otel_gateway::lifecycle::signals::wait_for_signal;
use otel_gateway::observability::logging::init_logging;
use otel_gateway::upstream::{echo, DEFAULT_SERVICE_ID};

#[derive(Parser)]
#[command(name = "upstream")]
#[command(about = "Echo service answering the gateway's proxied calls", long_about = None)]
struct Cli {
    #[arg(short, long, env = "UPSTREAM_BIND_ADDRESS", default_value = "0.0.0.0:8081")]
    bind: SocketAddr,

    /// Value of `serviceId` in every payload.
    #[arg(long, default_value = DEFAULT_SERVICE_ID)]
    service_id: String,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&ObservabilityConfig {
        log_level: cli.log_level.clone(),
        ..ObservabilityConfig::default()
    })?;

    let listener = TcpListener::bind(cli.bind).await?;
    tracing::info!(address = %listener.local_addr()?, service_id = %cli.service_id, "Upstream listening");

    axum::serve(listener, echo::router(&cli.service_id))
        .with_graceful_shutdown(wait_for_signal())
        .await?;

    tracing::info!("Upstream stopped");
    Ok(())
}
