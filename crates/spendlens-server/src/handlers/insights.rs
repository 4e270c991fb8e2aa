//! Model-written spending recap handler

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use spendlens_core::{generate_insight, load_spending_breakdown, AIBackend, Error};

use super::{read_csv_upload, PROCESSING_ERROR};
use crate::{AppError, AppState};

/// Detail returned when the provider rate limits or runs out of quota
pub const RATE_LIMIT_DETAIL: &str = "Rate limit exceeded or quota exhausted.";

/// Insight response
#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub summary: String,
}

/// POST /analyze (insight mode) - Ask the model to summarize an amount/category CSV
pub async fn analyze_insight(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<InsightResponse>, AppError> {
    let file_data = read_csv_upload(multipart).await?;

    let breakdown = load_spending_breakdown(file_data.as_slice()).context(PROCESSING_ERROR)?;

    match generate_insight(&state.ai, &breakdown).await {
        Ok(summary) => {
            info!(model = state.ai.model(), chars = summary.len(), "Insight generated");
            Ok(Json(InsightResponse { summary }))
        }
        Err(Error::RateLimited(msg)) => {
            warn!(model = state.ai.model(), provider = %msg, "Insight request rate limited");
            Err(AppError::rate_limited(RATE_LIMIT_DETAIL))
        }
        Err(Error::Provider(msg)) => {
            error!(model = state.ai.model(), provider = %msg, "Model provider error");
            Err(AppError::internal(&format!("Error from model: {}", msg)))
        }
        Err(e) => {
            error!(error = %e, "Insight request failed");
            Err(AppError::internal(&format!("Error from model: {}", e)))
        }
    }
}
