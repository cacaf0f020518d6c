//! Gateway / proxy service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client                    ┌──────────────── GATEWAY ────────────────┐
//!     ───────── /proxy ────────▶│  http   ──▶  gateway  ──▶  upstream     │──── /echo ────▶  Upstream
//!     ◀──── envelope 200/503 ───│  server      proxy()       client       │◀── payload ────  echo
//!                               │                 │          (timeout)    │                  service
//!     ───────── /health ───────▶│              health() ──▶  probe        │──── /health ──▶
//!     ◀──── HealthStatus ───────│                                         │
//!                               │  config · observability · lifecycle     │
//!                               └─────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use otel_gateway::config::load_config;
use otel_gateway::lifecycle::run_gateway;
use otel_gateway::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "Proxies requests to the upstream echo service and aggregates its health", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment overrides apply on top.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    init_logging(&config.observability)?;
    tracing::info!("gateway v{} starting", env!("CARGO_PKG_VERSION"));

    run_gateway(config).await?;
    Ok(())
}
