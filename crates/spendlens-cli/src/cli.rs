//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use spendlens_server::AnalyzeMode;

/// Spendlens - Summarize where your money went
#[derive(Parser)]
#[command(name = "spendlens")]
#[command(about = "Bank statement spending analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// What POST /analyze does: summary (rule-based rollups) or insight (model recap)
        #[arg(long, env = "SPENDLENS_MODE", default_value = "summary")]
        mode: AnalyzeMode,

        /// Comma-separated CORS origins allowed to call the API
        #[arg(long, env = "SPENDLENS_ALLOWED_ORIGINS", default_value = "")]
        allowed_origins: String,
    },

    /// Summarize a statement CSV and print the report as JSON
    Analyze {
        /// Statement CSV export
        #[arg(short, long)]
        file: PathBuf,

        /// Only print the summary for this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Ask the model for a recap of an amount/category CSV
    Insight {
        /// CSV with `amount` and `category` columns
        #[arg(short, long)]
        file: PathBuf,

        /// Model to use (overrides OPENAI_COMPATIBLE_MODEL)
        #[arg(long)]
        model: Option<String>,
    },
}
