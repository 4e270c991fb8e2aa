//! Mock backend for testing
//!
//! Useful for unit tests and development without a running LLM server.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AIBackend;

/// Canned reply returned by a default mock backend
pub const MOCK_SUMMARY: &str =
    "Most of your spending went to a handful of categories. Consider setting a monthly budget for the largest one.";

/// How the mock backend answers `complete`
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Return this text
    Reply(String),
    /// Simulate the provider refusing with a rate limit
    RateLimited,
    /// Simulate any other provider failure with this message
    Fail(String),
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self::Reply(MOCK_SUMMARY.to_string())
    }
}

/// Mock AI backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    pub behavior: MockBehavior,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            behavior: MockBehavior::default(),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            healthy: true,
            behavior,
        }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        match &self.behavior {
            MockBehavior::Reply(text) => Ok(text.clone()),
            MockBehavior::RateLimited => Err(Error::RateLimited(
                "Rate limit reached for requests".to_string(),
            )),
            MockBehavior::Fail(message) => Err(Error::Provider(message.clone())),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
