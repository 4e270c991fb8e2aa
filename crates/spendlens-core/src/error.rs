//! Error types for Spendlens

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    /// The model provider refused the request because of rate limiting or quota
    #[error("Rate limited by model provider: {0}")]
    RateLimited(String),

    /// Any other non-success reply from the model provider
    #[error("Model provider error: {0}")]
    Provider(String),
}

pub type Result<T> = std::result::Result<T, Error>;
