//! hostname-server entry point.
//!
//! Initializes tracing, loads the optional configuration, announces startup,
//! then binds the listener and serves until the process is killed.

use std::path::PathBuf;

use clap::Parser;

use hostname_server::config::{AppConfig, ANNOUNCE_TARGET, DEFAULT_LOG_FILTER, STARTUP_MESSAGE};
use hostname_server::http::start_server;
use hostname_server::{create_router, logging, AppState};

/// hostname-server: replies to every HTTP request with this machine's host name
#[derive(Parser, Debug)]
#[command(name = "hostname-server", version, about)]
struct Args {
    /// Path to an optional configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "hostname_server=debug")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration before tracing so the log format is known; config
    // errors go straight to stderr via main's Err return.
    let config = AppConfig::load(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    logging::init(&log_filter, config.logging.is_json())?;

    tracing::info!(target: ANNOUNCE_TARGET, "{}", STARTUP_MESSAGE);

    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }

    let addr = config.http.listen_addr();
    tracing::debug!(
        %addr,
        cache_hostname = config.whoami.cache_hostname,
        echo_request = config.whoami.echo_request,
        healthy_count = ?config.whoami.healthy_count,
        "Loaded configuration"
    );

    let state = AppState::from_config(config)?;
    let app = create_router(state);

    if let Err(e) = start_server(app, &addr).await {
        tracing::error!(error = %e, "Server failed");
        return Err(e.into());
    }

    Ok(())
}
