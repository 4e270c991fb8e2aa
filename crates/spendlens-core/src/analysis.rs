//! Monthly and overall spending rollups
//!
//! Records with a negative CAD amount are spending, positive are payments and
//! zero-amount records are ignored entirely. Amounts accumulate at full
//! precision and are only rounded to cents when a `Summary` is produced.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::categorize::categorize;
use crate::error::{Error, Result};
use crate::models::{AnalysisReport, Category, OverallSummary, Summary, TransactionRecord};

/// Running totals for one bucket
#[derive(Debug, Default)]
struct Totals {
    cad_spending: f64,
    usd_spending: f64,
    payments: f64,
    categories: BTreeMap<Category, f64>,
    spending_count: usize,
    payment_count: usize,
}

impl Totals {
    fn add(&mut self, record: &TransactionRecord, category: Option<Category>) {
        if record.is_spending() {
            self.cad_spending += record.cad;
            self.usd_spending += record.usd;
            self.spending_count += 1;
            if let Some(category) = category {
                *self.categories.entry(category).or_insert(0.0) += record.cad;
            }
        } else if record.is_payment() {
            self.payments += record.cad;
            self.payment_count += 1;
        }
    }

    fn finish(self) -> Summary {
        Summary {
            total_cad_spending: round_cents(self.cad_spending.abs()),
            total_usd_spending: round_cents(self.usd_spending.abs()),
            total_payments: round_cents(self.payments.abs()),
            category_breakdown: self
                .categories
                .into_iter()
                .map(|(category, amount)| (category, round_cents(amount.abs())))
                .collect(),
            spending_transaction_count: self.spending_count,
            payment_transaction_count: self.payment_count,
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format the span of transaction dates, e.g. "2024-01-03 to 2024-03-28"
///
/// An empty statement has no range. A statement whose rows all lack a
/// parseable date cannot produce one and is reported as an error.
fn date_range(records: &[TransactionRecord]) -> Result<Option<String>> {
    if records.is_empty() {
        return Ok(None);
    }

    let dates = || records.iter().filter_map(|r| r.transaction_date);
    let bounds: Option<(NaiveDate, NaiveDate)> = dates().min().zip(dates().max());

    match bounds {
        Some((start, end)) => Ok(Some(format!(
            "{} to {}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        ))),
        None => Err(Error::Analysis(
            "No parseable transaction dates to compute a date range".into(),
        )),
    }
}

/// Aggregate statement records into an overall summary and per-month summaries
///
/// Undated records count toward the overall totals but are left out of the
/// monthly breakdown.
pub fn analyze(records: &[TransactionRecord]) -> Result<AnalysisReport> {
    let mut overall = Totals::default();
    let mut months: BTreeMap<String, Totals> = BTreeMap::new();

    for record in records {
        let category = record
            .is_spending()
            .then(|| categorize(&record.description()));

        overall.add(record, category);

        if let Some(month) = record.month_key() {
            months.entry(month).or_default().add(record, category);
        }
    }

    let date_range = date_range(records)?;

    debug!(
        records = records.len(),
        months = months.len(),
        spending = overall.spending_count,
        payments = overall.payment_count,
        "Aggregated statement"
    );

    Ok(AnalysisReport {
        overall: OverallSummary {
            summary: overall.finish(),
            date_range,
        },
        by_month: months
            .into_iter()
            .map(|(month, totals)| (month, totals.finish()))
            .collect(),
    })
}
