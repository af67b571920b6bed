//! Chat service: input validation and session key resolution in front of the actors.

use std::sync::Arc;

use colloquy_types::chat::{ChatMessage, TurnReply};
use colloquy_types::config::{GenerationConfig, SessionConfig};
use colloquy_types::error::ChatError;
use tracing::debug;

use crate::chat::turn::TurnRunner;
use crate::llm::box_provider::BoxLlmProvider;
use crate::session::actor::SessionActors;
use crate::session::key::{SessionKeyAllocator, is_usable_key};
use crate::session::store::SessionStore;

/// Entry point for chat turns and session management.
///
/// Validates input, resolves the session key, and hands the work to the
/// key's actor so operations on one session never overlap.
pub struct ChatService<S: SessionStore + 'static> {
    actors: SessionActors<S>,
    allocator: SessionKeyAllocator,
}

impl<S: SessionStore + 'static> ChatService<S> {
    pub fn new(
        store: Arc<S>,
        provider: BoxLlmProvider,
        generation: &GenerationConfig,
        sessions: &SessionConfig,
    ) -> Self {
        let runner = TurnRunner::new(store, provider, generation);
        Self {
            actors: SessionActors::new(runner, sessions),
            allocator: SessionKeyAllocator::new(),
        }
    }

    /// Handle one user message.
    ///
    /// A missing or blank `session_key` gets a freshly allocated key, which
    /// is echoed back in the reply. Whitespace-only messages are rejected
    /// before anything touches the store.
    pub async fn handle_turn(
        &self,
        session_key: Option<String>,
        user_text: String,
    ) -> Result<TurnReply, ChatError> {
        if user_text.trim().is_empty() {
            return Err(ChatError::InvalidInput("Message is required".to_string()));
        }

        let session_key = match session_key {
            Some(key) if is_usable_key(&key) => key,
            _ => {
                let key = self.allocator.allocate()?;
                debug!(session_id = %key, "Allocated new session");
                key
            }
        };

        self.actors.turn(&session_key, user_text).await
    }

    /// Stored history for a session, oldest first.
    pub async fn history(&self, session_key: &str) -> Result<Vec<ChatMessage>, ChatError> {
        require_key(session_key)?;
        self.actors.history(session_key).await
    }

    /// Delete a session's history. Clearing an unknown session succeeds.
    pub async fn clear(&self, session_key: &str) -> Result<(), ChatError> {
        require_key(session_key)?;
        self.actors.clear(session_key).await
    }

    pub fn active_sessions(&self) -> usize {
        self.actors.active_sessions()
    }

    pub fn provider_name(&self) -> &str {
        self.actors.runner().provider_name()
    }
}

fn require_key(session_key: &str) -> Result<(), ChatError> {
    if is_usable_key(session_key) {
        Ok(())
    } else {
        Err(ChatError::InvalidInput("Session ID is required".to_string()))
    }
}

impl<S: SessionStore + 'static> std::fmt::Debug for ChatService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("actors", &self.actors)
            .field("provider", &self.provider_name())
            .finish()
    }
}
