//! Probe service entry point: CLI parsing, logging setup, configuration
//! load, listener bind, serve.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edge_probe::config::{self, ProbeConfig};
use edge_probe::http::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "edge-probe", about = "Edge HTTP diagnostic/probe service")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edge_probe=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ProbeConfig::default(),
    };
    config::apply_env_overrides(&mut config);
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    config::validate_config(&config)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rate_limit = config.rate_limit.limit,
        rate_limit_window_secs = config.rate_limit.window_secs,
        max_payload_bytes = config.payload.max_bytes,
        version = %config.build.version,
        "Configuration loaded"
    );

    if config.auth.probe_token.is_empty() {
        tracing::warn!("Probe token is unset; every expensive route will reject");
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            edge_probe::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
