//! Execution of a single chat turn against one session.
//!
//! `TurnRunner` assumes it has exclusive use of the session key for the
//! duration of `run`; `SessionActors` guarantees that by calling it from the
//! key's owning task only.

use std::sync::Arc;
use std::time::Instant;

use colloquy_types::chat::{ChatMessage, ReplySource, TurnReply};
use colloquy_types::config::GenerationConfig;
use colloquy_types::error::ChatError;
use colloquy_types::llm::CompletionRequest;
use tracing::{error, info, warn};

use crate::chat::fallback::{EMPTY_REPLY, fallback_reply};
use crate::chat::prompt::assemble_prompt;
use crate::llm::box_provider::BoxLlmProvider;
use crate::session::store::SessionStore;

/// Runs turns: history read, prompt assembly, generation, persistence.
pub struct TurnRunner<S: SessionStore> {
    store: Arc<S>,
    provider: BoxLlmProvider,
    model: String,
    max_tokens: u32,
    temperature: Option<f64>,
}

impl<S: SessionStore> TurnRunner<S> {
    pub fn new(store: Arc<S>, provider: BoxLlmProvider, generation: &GenerationConfig) -> Self {
        Self {
            store,
            provider,
            model: generation.model.clone(),
            max_tokens: generation.max_tokens,
            temperature: generation.temperature,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Execute one turn for `session_key`.
    ///
    /// Generation failures are absorbed into the fallback reply. A store
    /// failure aborts the turn with `ChatError::Persistence`; the reply that
    /// was already generated is dropped.
    pub async fn run(&self, session_key: &str, user_text: &str) -> Result<TurnReply, ChatError> {
        let started = Instant::now();

        let history = self.store.get_history(session_key).await.map_err(|e| {
            error!(session_id = %session_key, error = %e, "Failed to load session history");
            ChatError::Persistence(e)
        })?;

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: assemble_prompt(&history, user_text),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let (reply, source) = self.generate(&request, user_text).await;

        // Both messages land in one atomic append: the turn is recorded
        // completely or not at all.
        let user = ChatMessage::user(user_text);
        let assistant = ChatMessage::assistant(reply.clone());
        if let Err(e) = self
            .store
            .append_messages(session_key, &[user, assistant])
            .await
        {
            error!(session_id = %session_key, error = %e, "Failed to persist turn");
            return Err(ChatError::Persistence(e));
        }

        info!(
            session_id = %session_key,
            source = %source,
            history_len = history.len(),
            prompt_len = request.messages.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Turn completed"
        );

        Ok(TurnReply {
            reply,
            session_id: session_key.to_string(),
            source,
        })
    }

    async fn generate(&self, request: &CompletionRequest, user_text: &str) -> (String, ReplySource) {
        match self.provider.complete(request).await {
            Ok(response) => match response.content {
                Some(text) if !text.trim().is_empty() => (text, ReplySource::Model),
                _ => {
                    warn!(provider = %self.provider.name(), "Provider returned an empty completion");
                    (EMPTY_REPLY.to_string(), ReplySource::Placeholder)
                }
            },
            Err(e) => {
                warn!(
                    provider = %self.provider.name(),
                    error = %e,
                    "Generation unavailable, using offline fallback"
                );
                (fallback_reply(user_text), ReplySource::Fallback)
            }
        }
    }
}
