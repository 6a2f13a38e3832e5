//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// Implementations of this trait provide access to different LLM services.
/// Deterministic implementations (scripted or echoing) stand in for the real
/// service in tests.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion from the LLM
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g. "anthropic")
    fn name(&self) -> &str;
}
