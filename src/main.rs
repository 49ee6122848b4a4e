//! DeltaMemory CLI binary entry point.

use clap::Parser;
use deltamemory::cli::{self, Cli};
use deltamemory::config::ClientConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Log to stderr so stdout stays clean for MCP JSON-RPC and JSON output.
    let filter = cli
        .global
        .log_level
        .as_deref()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match ClientConfig::load(cli.global.to_layer()) {
        Ok(config) => cli::run(cli.command, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
