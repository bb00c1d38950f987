//! Flightdeck command-line client.
//!
//! Usage:
//!   flightdeck --url https://builder.example.com list --type l
//!   flightdeck show 1003
//!
//! Logs go to stderr; command output goes to stdout.

use anyhow::Result;
use clap::Parser;
use flightdeck_cli::{Args, run};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let mut stdout = std::io::stdout().lock();
    run(&args, &mut stdout).await
}
