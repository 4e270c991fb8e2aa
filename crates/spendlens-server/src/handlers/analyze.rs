//! Statement summary handler

use anyhow::Context;
use axum::{
    extract::{multipart::MultipartRejection, Multipart},
    Json,
};
use tracing::info;

use spendlens_core::{analyze, load_transactions, AnalysisReport};

use super::{read_csv_upload, PROCESSING_ERROR};
use crate::AppError;

/// POST /analyze (summary mode) - Summarize an uploaded statement CSV
pub async fn analyze_statement(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisReport>, AppError> {
    let file_data = read_csv_upload(multipart).await?;

    let report = summarize_statement(&file_data)?;

    info!(
        bytes = file_data.len(),
        months = report.by_month.len(),
        spending = report.overall.summary.spending_transaction_count,
        payments = report.overall.summary.payment_transaction_count,
        "Statement analyzed"
    );

    Ok(Json(report))
}

fn summarize_statement(file_data: &[u8]) -> anyhow::Result<AnalysisReport> {
    let records = load_transactions(file_data).context(PROCESSING_ERROR)?;
    let report = analyze(&records).context(PROCESSING_ERROR)?;
    Ok(report)
}
