//! Scoring API server
//!
//! Starts the HTTP server that validates and dispatches scoring requests.

use clap::Parser;
use scoring_api::{config::ScoringConfig, start_server, telemetry, ServerError};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "scoring-api")]
#[command(about = "Request validation and dispatch service for scoring queries", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "SCORING_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log file (overrides the config file; stderr when unset)
    #[arg(short, long)]
    log: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let mut config = match &cli.config {
        Some(path) => ScoringConfig::from_file(path)?,
        None => {
            eprintln!("Warning: No config file specified, using default test configuration");
            eprintln!("Usage: scoring-api --config <path-to-config.toml>");
            eprintln!();
            ScoringConfig::default_test_config()
        }
    };

    if let Some(port) = cli.port {
        config.bind_port = port;
    }
    if let Some(log) = cli.log {
        config.log_file = Some(log);
    }

    telemetry::init(config.log_file.as_deref())?;
    start_server(config).await
}
