//! Natural-language spending recaps
//!
//! Turns a total/category breakdown into a prompt for a chat model and returns
//! the model's reply. This is an alternative to the rule-based analysis, not a
//! step after it.

use std::fmt::Write;

use tracing::info;

use crate::ai::AIBackend;
use crate::error::Result;
use crate::models::SpendingBreakdown;

/// Build the prompt sent to the model for a spending breakdown
pub fn build_insight_prompt(breakdown: &SpendingBreakdown) -> String {
    let mut prompt = String::from(
        "You are a financial assistant. Here's a breakdown of user spending:\n\n",
    );

    let _ = writeln!(prompt, "Total: ${:.2}", breakdown.total);
    prompt.push_str("Categories:\n");
    if breakdown.categories.is_empty() {
        prompt.push_str("- (none)\n");
    }
    for (category, amount) in &breakdown.categories {
        let _ = writeln!(prompt, "- {}: ${:.2}", category, amount);
    }

    prompt.push_str("\nSummarize insights in natural language.");
    prompt
}

/// Ask the model for a natural-language recap of a spending breakdown
pub async fn generate_insight<B>(ai: &B, breakdown: &SpendingBreakdown) -> Result<String>
where
    B: AIBackend + ?Sized,
{
    let prompt = build_insight_prompt(breakdown);

    info!(
        model = ai.model(),
        host = ai.host(),
        categories = breakdown.categories.len(),
        "Requesting spending insight"
    );

    ai.complete(&prompt).await
}
