//! Chat completion provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for single-turn answer generation
///
/// Each call is stateless: the prompt must carry the full context, there is
/// no hidden conversation memory on the provider side. Callers must not
/// assume the returned text is non-empty.
///
/// Implementations:
/// - `OpenAiChat`: hosted OpenAI chat completions (gpt-4o-mini)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for a fully composed prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model identifier in use
    fn model(&self) -> &str;
}
