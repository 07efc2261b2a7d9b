//! # cjsrt - CircuitJS1 text/JSON roundtrip verifier
//!
//! Loads circuit fixtures, drives them through text and JSON import/export,
//! and reports whether each roundtrip is lossless.

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cjs_cli::{CjsCli, CliResult};

#[tokio::main]
async fn main() -> CliResult<()> {
    // Parse CLI arguments
    let cli = CjsCli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute the command
    if let Err(err) = cli.execute().await {
        error!("Command failed: {}", err);
        std::process::exit(1);
    }

    Ok(())
}
