//! Insight command implementation

use std::path::Path;

use anyhow::{Context, Result};
use spendlens_core::{generate_insight, load_spending_breakdown, AIBackend, AIClient, Error};

use super::open_csv;

pub async fn cmd_insight(file: &Path, model: Option<&str>) -> Result<()> {
    let mut ai = AIClient::from_env();
    if let Some(model) = model {
        ai = ai.with_model(model);
    }

    println!("🤖 Asking {} at {}...", ai.model(), ai.host());
    println!();

    let summary = insight_for_file(&ai, file).await?;
    println!("{}", summary);
    Ok(())
}

/// Load an amount/category CSV and ask the model to summarize it
pub async fn insight_for_file(ai: &AIClient, file: &Path) -> Result<String> {
    let breakdown = load_spending_breakdown(open_csv(file)?)
        .with_context(|| format!("Failed to parse spending breakdown: {}", file.display()))?;

    match generate_insight(ai, &breakdown).await {
        Ok(summary) => Ok(summary),
        Err(Error::RateLimited(msg)) => Err(anyhow::anyhow!(
            "Rate limit exceeded or quota exhausted. ({})",
            msg
        )),
        Err(e) => Err(e).context("Error from model"),
    }
}
