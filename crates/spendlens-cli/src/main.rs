//! Spendlens CLI - Bank statement spending analyzer
//!
//! Usage:
//!   spendlens serve --port 8000              Start web server (summary mode)
//!   spendlens serve --mode insight           Start web server (model recaps)
//!   spendlens analyze --file statement.csv   Print monthly/overall rollups
//!   spendlens insight --file breakdown.csv   Print a model-written recap

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so JSON output on stdout stays machine-readable
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    match cli.command {
        Commands::Serve {
            port,
            host,
            mode,
            allowed_origins,
        } => commands::cmd_serve(&host, port, mode, &allowed_origins).await,
        Commands::Analyze { file, month } => commands::cmd_analyze(&file, month.as_deref()),
        Commands::Insight { file, model } => commands::cmd_insight(&file, model.as_deref()).await,
    }
}
