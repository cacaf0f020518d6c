use clap::{Parser, Subcommand};
use serde_json::Value;
use std::time::Duration;

use otel_gateway::client::{GatewayClient, RequestHistory};
use otel_gateway::http::ProxyMethod;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Send requests through the gateway and watch its health", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send proxied requests and print the request history
    Send {
        #[arg(short, long, default_value = "GET")]
        method: ProxyMethod,
        /// JSON body for POST/PUT
        #[arg(short, long)]
        payload: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        repeat: usize,
    },
    /// Print gateway and upstream health once
    Health,
    /// Poll health on an interval
    Watch {
        #[arg(short, long, default_value_t = 5)]
        interval_secs: u64,
        /// Stop after this many polls (default: run until Ctrl+C)
        #[arg(short, long)]
        count: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = GatewayClient::new(&cli.url);

    match cli.command {
        Commands::Send { method, payload, repeat } => {
            let payload: Option<Value> = payload.as_deref().map(serde_json::from_str).transpose()?;
            let mut history = RequestHistory::new();

            for _ in 0..repeat {
                let reply = client.send(method, payload.as_ref()).await?;
                println!("HTTP {} in {}ms", reply.status, reply.round_trip.as_millis());
                println!("{}", serde_json::to_string_pretty(&reply.envelope)?);
                history.record(reply.history_entry());
            }

            println!("\nRecent requests (newest first):");
            for entry in history.iter() {
                println!(
                    "  {}  {:<6} {}  {:>5}ms",
                    entry.timestamp.format("%H:%M:%S%.3f"),
                    entry.method,
                    entry.status_code,
                    entry.round_trip_ms
                );
            }
        }
        Commands::Health => {
            let health = client.health().await?;
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
        Commands::Watch { interval_secs, count } => {
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
            let mut polls = 0;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = tokio::signal::ctrl_c() => break,
                }
                match client.health().await {
                    Ok(h) => println!(
                        "gateway={:?} upstream={:?} latency={} error={}",
                        h.self_status,
                        h.dependency_status,
                        h.dependency_latency_ms.map_or("-".to_string(), |ms| format!("{}ms", ms)),
                        h.dependency_error.as_deref().unwrap_or("-"),
                    ),
                    Err(e) => eprintln!("gateway unreachable: {}", e),
                }
                polls += 1;
                if count.is_some_and(|limit| polls >= limit) {
                    break;
                }
            }
        }
    }

    Ok(())
}
