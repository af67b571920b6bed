//! SessionStore trait definition.
//!
//! Per-key append-only message log. Sessions are created implicitly by the
//! first append (get-or-create); there is no separate creation step.

use colloquy_types::chat::ChatMessage;
use colloquy_types::error::RepositoryError;

/// Repository trait for per-session message history.
///
/// Implementations live in colloquy-infra (e.g., `SqliteSessionStore`) and in
/// this crate (`InMemorySessionStore`). Uses native async fn in traits
/// (RPITIT, Rust 2024 edition).
///
/// Appends for one key must never be reordered: readers observe exactly the
/// sequence of appends the store received.
pub trait SessionStore: Send + Sync {
    /// Get the full history of a session, oldest first.
    ///
    /// Returns an empty list for a key that was never written.
    fn get_history(
        &self,
        session_key: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Append one message to the end of a session.
    fn add_message(
        &self,
        session_key: &str,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append several messages in order as one atomic write.
    ///
    /// Either every message is stored or none is.
    fn append_messages(
        &self,
        session_key: &str,
        messages: &[ChatMessage],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove the whole history of a session. No-op for unknown keys.
    fn clear_history(
        &self,
        session_key: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Number of messages stored for a session.
    fn message_count(
        &self,
        session_key: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
