//! Spendlens Core Library
//!
//! Shared functionality for the Spendlens statement analyzer:
//! - CSV loader for bank statement exports
//! - Keyword rule categorizer
//! - Monthly and overall spending aggregation
//! - Pluggable AI backends for natural-language spending recaps

pub mod ai;
pub mod analysis;
pub mod categorize;
pub mod error;
pub mod import;
pub mod insights;
pub mod models;

/// Test utilities including mock completion server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, MockBackend, MockBehavior, OpenAICompatibleBackend};
pub use analysis::analyze;
pub use categorize::categorize;
pub use error::{Error, Result};
pub use import::{load_spending_breakdown, load_transactions};
pub use insights::{build_insight_prompt, generate_insight};
pub use models::{
    AnalysisReport, Category, OverallSummary, SpendingBreakdown, Summary, TransactionRecord,
};
