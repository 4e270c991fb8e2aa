//! Analyze command implementation

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use spendlens_core::{analyze, load_transactions, AnalysisReport};
use tracing::info;

use super::open_csv;

pub fn cmd_analyze(file: &Path, month: Option<&str>) -> Result<()> {
    let report = analyze_file(file)?;
    println!("{}", render_report(&report, month)?);
    Ok(())
}

/// Load and aggregate a statement CSV
pub fn analyze_file(file: &Path) -> Result<AnalysisReport> {
    let records = load_transactions(open_csv(file)?)
        .with_context(|| format!("Failed to parse statement: {}", file.display()))?;

    let report = analyze(&records).context("Failed to analyze statement")?;

    info!(
        file = %file.display(),
        records = records.len(),
        months = report.by_month.len(),
        "Statement analyzed"
    );

    Ok(report)
}

/// Render the full report, or a single month's summary, as pretty JSON
pub fn render_report(report: &AnalysisReport, month: Option<&str>) -> Result<String> {
    let json = match month {
        None => serde_json::to_string_pretty(report)?,
        Some(month) => {
            validate_month(month)?;
            let Some(summary) = report.by_month.get(month) else {
                bail!(
                    "No transactions in {} (statement covers: {})",
                    month,
                    report
                        .by_month
                        .keys()
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            };
            serde_json::to_string_pretty(summary)?
        }
    };
    Ok(json)
}

/// Check that a month key looks like YYYY-MM
fn validate_month(month: &str) -> Result<()> {
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map(|_| ())
        .with_context(|| format!("Invalid month '{}' (expected YYYY-MM)", month))
}
