//! LLM provider seam for the investment research pipeline
//!
//! The pipeline uses language models only to write prose over data that has
//! already been fetched; which tool to call is decided by typed control flow,
//! never by the model. The contract here is therefore deliberately small:
//! a prompt goes in, text and token usage come out.

pub mod completion;
pub mod error;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, TokenUsage};
pub use error::{LlmError, Result};
pub use provider::LlmProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "anthropic")]
pub mod providers;
