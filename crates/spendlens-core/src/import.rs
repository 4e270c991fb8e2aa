//! CSV loaders for bank statement exports
//!
//! Statement exports are positional: the header row is discarded and the
//! columns are always read as
//! `Account Type,Account Number,Transaction Date,Cheque Number,Description 1,Description 2,CAD,USD`.
//! Exports often carry a trailing delimiter, so rows may be wider or narrower
//! than that; a single bad field never aborts the load.

use std::borrow::Cow;
use std::io::Read;

use chrono::NaiveDate;
use csv::{ByteRecord, ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{SpendingBreakdown, TransactionRecord};

const ACCOUNT_TYPE_COL: usize = 0;
const ACCOUNT_NUMBER_COL: usize = 1;
const DATE_COL: usize = 2;
const CHEQUE_NUMBER_COL: usize = 3;
const DESCRIPTION_1_COL: usize = 4;
const DESCRIPTION_2_COL: usize = 5;
const CAD_COL: usize = 6;
const USD_COL: usize = 7;

/// Read a field as text, decoding invalid UTF-8 lossily
fn field(record: &ByteRecord, index: usize) -> Option<Cow<'_, str>> {
    record.get(index).map(String::from_utf8_lossy)
}

/// Read a text field, treating empty and missing values as null
fn text_field(record: &ByteRecord, index: usize) -> Option<String> {
    field(record, index)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Read an amount field, falling back to zero
fn amount_field(record: &ByteRecord, index: usize) -> f64 {
    field(record, index)
        .and_then(|s| parse_amount(&s))
        .unwrap_or(0.0)
}

/// Parse statement CSV data into transaction records, preserving row order
///
/// Fails only when the stream cannot be read or holds no header row at all.
pub fn load_transactions<R: Read>(reader: R) -> Result<Vec<TransactionRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.byte_headers()?;
    if headers.is_empty() {
        return Err(Error::Import("No columns to parse from file".into()));
    }

    let mut transactions = Vec::new();
    let mut undated = 0;

    for result in rdr.byte_records() {
        let record = result?;

        let transaction_date = field(&record, DATE_COL).and_then(|s| parse_date(&s));
        if transaction_date.is_none() {
            undated += 1;
        }

        transactions.push(TransactionRecord {
            account_type: text_field(&record, ACCOUNT_TYPE_COL),
            account_number: text_field(&record, ACCOUNT_NUMBER_COL),
            transaction_date,
            cheque_number: text_field(&record, CHEQUE_NUMBER_COL),
            description_1: text_field(&record, DESCRIPTION_1_COL),
            description_2: text_field(&record, DESCRIPTION_2_COL),
            cad: amount_field(&record, CAD_COL),
            usd: amount_field(&record, USD_COL),
        });
    }

    debug!(
        records = transactions.len(),
        undated, "Parsed statement transactions"
    );
    Ok(transactions)
}

/// Parse an `amount`/`category` CSV into totals for the insight prompt
///
/// Columns are located by header name. Rows without a category still count
/// toward the total.
pub fn load_spending_breakdown<R: Read>(reader: R) -> Result<SpendingBreakdown> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.byte_headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| String::from_utf8_lossy(h).trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::Import(format!("Missing required column: {}", name)))
    };
    let amount_col = column("amount")?;
    let category_col = column("category")?;

    let mut breakdown = SpendingBreakdown::default();
    let mut rows = 0;

    for result in rdr.byte_records() {
        let record = result?;
        rows += 1;

        let amount = amount_field(&record, amount_col);
        breakdown.total += amount;

        if let Some(category) = text_field(&record, category_col) {
            *breakdown.categories.entry(category).or_insert(0.0) += amount;
        }
    }

    debug!(
        rows,
        categories = breakdown.categories.len(),
        "Parsed spending breakdown"
    );
    Ok(breakdown)
}

/// Parse a date string in various common formats
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%y", // 01/15/24 (before %Y, which would read "24" as year 24)
        "%m/%d/%Y", // 01/15/2024
        "%m-%d-%Y", // 01-15-2024
        "%d/%m/%Y", // 15/01/2024 (European)
        "%Y/%m/%d", // 2024/01/15
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse an amount string, handling currency symbols, commas and parentheses
fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
