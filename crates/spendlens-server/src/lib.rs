//! Spendlens Web Server
//!
//! Axum-based REST API for the Spendlens statement analyzer.
//!
//! The server runs in one of two modes chosen at startup:
//! - `summary` (default): `POST /analyze` returns monthly and overall rollups
//! - `insight`: `POST /analyze` returns a model-written recap of an
//!   amount/category breakdown
//!
//! Error responses are sanitized and always shaped as `{"detail": "..."}`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use spendlens_core::{AIBackend, AIClient};

mod handlers;

/// Maximum file upload size (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Which behavior `POST /analyze` exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzeMode {
    /// Statement CSV → overall and monthly spending summaries
    #[default]
    Summary,
    /// Amount/category CSV → natural-language recap from the model
    Insight,
}

impl AnalyzeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzeMode::Summary => "summary",
            AnalyzeMode::Insight => "insight",
        }
    }
}

impl fmt::Display for AnalyzeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyzeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(AnalyzeMode::Summary),
            "insight" | "insights" => Ok(AnalyzeMode::Insight),
            other => Err(format!(
                "Unknown mode '{}' (expected 'summary' or 'insight')",
                other
            )),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Behavior of `POST /analyze`
    pub mode: AnalyzeMode,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub config: ServerConfig,
    pub ai: AIClient,
}

/// Parse a comma-separated origin list, skipping blanks
pub fn parse_allowed_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Create the application router, building the AI client from the environment
pub fn create_router(config: ServerConfig) -> Router {
    let ai = AIClient::from_env();
    if config.mode == AnalyzeMode::Insight {
        info!(
            "AI backend configured: {} (model: {})",
            ai.host(),
            ai.model()
        );
    }
    create_router_with_ai(config, ai)
}

/// Create the application router with an explicit AI client (for testing)
pub fn create_router_with_ai(config: ServerConfig, ai: AIClient) -> Router {
    let analyze = match config.mode {
        AnalyzeMode::Summary => post(handlers::analyze_statement),
        AnalyzeMode::Insight => post(handlers::analyze_insight),
    };

    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    let state = Arc::new(AppState { config, ai });

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/analyze", analyze)
        .with_state(state)
        // Leave headroom for multipart framing; the handlers enforce the file limit
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + 64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server with custom configuration
pub async fn serve_with_config(host: &str, port: u16, config: ServerConfig) -> anyhow::Result<()> {
    info!(mode = %config.mode, "Analyze endpoint mode");

    if config.mode == AnalyzeMode::Insight {
        check_ai_connection().await;
    }

    let app = create_router(config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
async fn check_ai_connection() {
    let client = AIClient::from_env();

    if client.health_check().await {
        info!(
            "✅ AI backend connected: {} (model: {})",
            client.host(),
            client.model()
        );
    } else {
        warn!(
            "⚠️  AI backend configured but not responding: {} (model: {})",
            client.host(),
            client.model()
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn rate_limited(msg: &str) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = ?err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "detail": self.message
        }));

        (self.status, body).into_response()
    }
}

/// Convert any error into a 500
///
/// When the error carries `anyhow` context, the outermost context is the
/// client-facing detail and the cause chain is only logged. Errors without
/// context get a generic detail.
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        let message = if err.chain().nth(1).is_some() {
            err.to_string()
        } else {
            "An internal error occurred".to_string()
        };
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
