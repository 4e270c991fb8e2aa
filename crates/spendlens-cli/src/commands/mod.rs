//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Statement rollups printed as JSON
//! - `insight` - Model-written recap of a spending breakdown
//! - `serve` - Web server command

pub mod analyze;
pub mod insight;
pub mod serve;

// Re-export command functions for main.rs
pub use analyze::*;
pub use insight::*;
pub use serve::*;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};

/// Open a CSV input file for buffered reading
pub fn open_csv(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    Ok(BufReader::new(file))
}
