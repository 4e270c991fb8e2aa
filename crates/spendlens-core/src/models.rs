//! Domain models for Spendlens

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single row of a bank statement export
///
/// Always carries exactly these eight fields no matter how wide the source row
/// was. Text fields that were empty or missing are `None`; amounts that were
/// missing or unparseable are `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub account_type: Option<String>,
    pub account_number: Option<String>,
    /// `None` when the date column could not be parsed
    pub transaction_date: Option<NaiveDate>,
    pub cheque_number: Option<String>,
    pub description_1: Option<String>,
    pub description_2: Option<String>,
    /// Amount in local currency (negative = spending, positive = payment)
    pub cad: f64,
    /// Amount in foreign currency
    pub usd: f64,
}

impl TransactionRecord {
    /// Combined free-text description used for categorization
    pub fn description(&self) -> String {
        [self.description_1.as_deref(), self.description_2.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Year-month bucket key ("YYYY-MM"), if the record is dated
    pub fn month_key(&self) -> Option<String> {
        self.transaction_date
            .map(|date| date.format("%Y-%m").to_string())
    }

    pub fn is_spending(&self) -> bool {
        self.cad < 0.0
    }

    pub fn is_payment(&self) -> bool {
        self.cad > 0.0
    }
}

/// Fixed spending categories
///
/// Declaration order matches the categorizer's rule order, and the derived
/// `Ord` keeps breakdowns in that order when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Transportation,
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    #[serde(rename = "Shopping & Retail")]
    ShoppingAndRetail,
    #[serde(rename = "Fitness & Recreation")]
    FitnessAndRecreation,
    #[serde(rename = "Alcohol & Beverages")]
    AlcoholAndBeverages,
    #[serde(rename = "Subscriptions & Tech")]
    SubscriptionsAndTech,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transportation => "Transportation",
            Self::FoodAndDining => "Food & Dining",
            Self::ShoppingAndRetail => "Shopping & Retail",
            Self::FitnessAndRecreation => "Fitness & Recreation",
            Self::AlcoholAndBeverages => "Alcohol & Beverages",
            Self::SubscriptionsAndTech => "Subscriptions & Tech",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spending rollup for one month bucket or for the whole statement
///
/// All amounts are absolute values rounded to cents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total_cad_spending: f64,
    pub total_usd_spending: f64,
    pub total_payments: f64,
    pub category_breakdown: BTreeMap<Category, f64>,
    pub spending_transaction_count: usize,
    pub payment_transaction_count: usize,
}

/// Statement-wide summary plus the span of transaction dates
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverallSummary {
    #[serde(flatten)]
    pub summary: Summary,
    /// e.g. "2024-01-03 to 2024-03-28"; `None` when the statement has no rows
    pub date_range: Option<String>,
}

/// Result of analyzing a statement
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub overall: OverallSummary,
    /// Keyed by "YYYY-MM", ascending
    pub by_month: BTreeMap<String, Summary>,
}

/// Total and per-category amounts fed to the insight prompt
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpendingBreakdown {
    pub total: f64,
    pub categories: BTreeMap<String, f64>,
}
