//! Provider used when no generation backend is configured.

use colloquy_core::llm::provider::LlmProvider;
use colloquy_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Always reports itself unavailable, so every turn gets the offline
/// fallback reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl LlmProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::Unavailable(
            "no generation provider configured".to_string(),
        ))
    }
}
