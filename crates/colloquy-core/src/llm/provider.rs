//! LlmProvider trait definition.
//!
//! This is the generation capability the chat pipeline calls: an ordered
//! list of `{role, content}` messages in, free text out. Non-streaming.

use colloquy_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for generation backends (Workers AI, OpenAI, an offline stub, ...).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in colloquy-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "workers-ai", "offline").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
