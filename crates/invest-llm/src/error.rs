//! Error types for LLM providers

use thiserror::Error;

/// Result type alias for LLM operations
pub type Result<T> = std::result::Result<T, LlmError>;

/// Error type for LLM provider operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// API key rejected
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Provider rate limit hit
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Request rejected by the provider
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown model identifier
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Missing or invalid provider configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Transport or other request failure
    #[error("Request failed: {0}")]
    RequestFailed(String),
}

#[cfg(feature = "anthropic")]
impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::RequestFailed(err.to_string())
    }
}

impl From<LlmError> for invest_core::Error {
    fn from(err: LlmError) -> Self {
        invest_core::Error::Llm(err.to_string())
    }
}
