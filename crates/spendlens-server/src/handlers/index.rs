//! Service descriptor and liveness handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AnalyzeMode, AppState};

/// Service descriptor
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub mode: AnalyzeMode,
    pub endpoints: Vec<&'static str>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET / - Describe the service
pub async fn index(State(state): State<Arc<AppState>>) -> Json<IndexResponse> {
    Json(IndexResponse {
        name: "spendlens",
        version: env!("CARGO_PKG_VERSION"),
        mode: state.config.mode,
        endpoints: vec!["GET /", "GET /health", "POST /analyze"],
    })
}

/// GET /health - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
