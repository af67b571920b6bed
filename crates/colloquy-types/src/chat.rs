//! Chat message and turn types for Colloquy.
//!
//! A session is an ordered list of [`ChatMessage`]s keyed by an opaque string.
//! A turn produces a [`TurnReply`].

use chrono::Utc;
use serde::{Deserialize, Serialize};

use std::fmt;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

use crate::llm::PromptMessage;

/// A single stored message within a session.
///
/// Immutable once created. `timestamp` is wall-clock milliseconds since the
/// Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: i64,
}

impl ChatMessage {
    /// Build a message stamped with the current time.
    pub fn now(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: now_millis(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::now(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::now(MessageRole::Assistant, content)
    }

    /// Strip the timestamp for inclusion in a prompt.
    pub fn to_prompt(&self) -> PromptMessage {
        PromptMessage::new(self.role, self.content.clone())
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Where the reply text of a turn came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    /// Text returned by the generation provider.
    Model,
    /// The provider answered with nothing usable.
    Placeholder,
    /// The provider failed; the offline template was used.
    Fallback,
}

impl fmt::Display for ReplySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplySource::Model => write!(f, "model"),
            ReplySource::Placeholder => write!(f, "placeholder"),
            ReplySource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Result of one completed turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnReply {
    pub reply: String,
    pub session_id: String,
    pub source: ReplySource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_reexport() {
        // Verify MessageRole is accessible from the chat module.
        let role = MessageRole::User;
        assert_eq!(role.to_string(), "user");
    }

    #[test]
    fn test_chat_message_serialize() {
        let msg = ChatMessage {
            role: MessageRole::Assistant,
            content: "Use Workers + D1.".to_string(),
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "Use Workers + D1.");
        assert_eq!(json["timestamp"], 1_700_000_000_000i64);
    }

    #[test]
    fn test_constructors_stamp_time() {
        let before = now_millis();
        let msg = ChatMessage::user("hi");
        let after = now_millis();
        assert_eq!(msg.role, MessageRole::User);
        assert!(msg.timestamp >= before && msg.timestamp <= after);
    }

    #[test]
    fn test_to_prompt_drops_timestamp() {
        let msg = ChatMessage::assistant("hello");
        let prompt = msg.to_prompt();
        assert_eq!(prompt.role, MessageRole::Assistant);
        assert_eq!(prompt.content, "hello");
    }

    #[test]
    fn test_reply_source_serde() {
        let json = serde_json::to_string(&ReplySource::Fallback).unwrap();
        assert_eq!(json, "\"fallback\"");
        assert_eq!(ReplySource::Placeholder.to_string(), "placeholder");
    }
}
