//! In-memory session store.
//!
//! Keeps every session in a `HashMap` behind a tokio `RwLock`. Nothing
//! survives a restart; used for `storage.backend = "memory"` and in tests.

use std::collections::HashMap;

use colloquy_types::chat::ChatMessage;
use colloquy_types::error::RepositoryError;
use tokio::sync::RwLock;

use super::store::SessionStore;

/// Process-local implementation of `SessionStore`.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Vec<ChatMessage>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently holding at least one message.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl SessionStore for InMemorySessionStore {
    async fn get_history(&self, session_key: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        Ok(self
            .sessions
            .read()
            .await
            .get(session_key)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_message(
        &self,
        session_key: &str,
        message: &ChatMessage,
    ) -> Result<(), RepositoryError> {
        self.append_messages(session_key, std::slice::from_ref(message))
            .await
    }

    async fn append_messages(
        &self,
        session_key: &str,
        messages: &[ChatMessage],
    ) -> Result<(), RepositoryError> {
        if messages.is_empty() {
            return Ok(());
        }
        self.sessions
            .write()
            .await
            .entry(session_key.to_string())
            .or_default()
            .extend_from_slice(messages);
        Ok(())
    }

    async fn clear_history(&self, session_key: &str) -> Result<(), RepositoryError> {
        self.sessions.write().await.remove(session_key);
        Ok(())
    }

    async fn message_count(&self, session_key: &str) -> Result<u64, RepositoryError> {
        Ok(self
            .sessions
            .read()
            .await
            .get(session_key)
            .map_or(0, |history| history.len() as u64))
    }
}
