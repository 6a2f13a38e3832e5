//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// Trait implemented by every externally invocable agent
///
/// The hosting runtime only ever sees this boundary: a user request goes in,
/// a text report comes out. Internal pipeline stages (resolution, retrieval,
/// synthesis) are not independently addressable through it.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process a user request and return the resulting report text
    ///
    /// Input and output are intentionally kept as `String` for maximum
    /// flexibility. Concrete implementations parse or format as needed.
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;

    /// Initialize the agent (optional)
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Shutdown the agent (optional)
    async fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}
