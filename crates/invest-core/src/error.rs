//! Error types shared across the pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pipeline operations
///
/// Resolution failure is the only class that aborts a whole analysis; data
/// source failures are caught at the tool boundary and degrade to error-status
/// envelopes, so they normally never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// Component initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Company name could not be resolved to a canonical identifier
    #[error("Identifier resolution failed: {0}")]
    ResolutionFailed(String),

    /// A warehouse query or market-data API call failed
    #[error("Data source error: {0}")]
    DataSource(String),

    /// The language model returned an error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Rendering a prompt or report template failed
    #[error("Template error: {0}")]
    Template(String),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic processing failure
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}
