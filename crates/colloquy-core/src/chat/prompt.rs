//! Prompt assembly.
//!
//! The prompt sent to the provider is always: one system preamble, then the
//! most recent [`HISTORY_WINDOW`] stored messages (minus any `system` entries),
//! then the new user message. No summarization or length-based truncation.

use colloquy_types::chat::{ChatMessage, MessageRole};
use colloquy_types::llm::PromptMessage;

/// Maximum number of stored messages included in a prompt.
pub const HISTORY_WINDOW: usize = 10;

/// Fixed assistant preamble. Injected at assembly time, never persisted.
pub const SYSTEM_PROMPT: &str = "You are an expert Cloudflare AI App Builder assistant. Your role is to help users design and build Cloudflare Workers applications that use AI capabilities.

When users describe what they want to build, you should:

1. Analyse their requirements and suggest an architecture using:
   - Cloudflare Workers for serverless compute
   - Workers AI for LLM inference (recommend appropriate models like Llama 3.3)
   - Durable Objects for state management and coordination
   - Assets for serving static HTML/CSS/JS interfaces

2. Provide a clear file structure for their project, showing what files they need and where they go.

3. Offer TypeScript code examples that are:
   - Production-ready and well-commented
   - Following Cloudflare Workers best practices
   - Using British English in comments and user-facing text
   - Minimal and without unnecessary frameworks

4. Explain how different components work together (e.g., how the frontend calls the Worker, how the Worker uses Durable Objects, how to integrate Workers AI).

5. Suggest appropriate Workers AI models based on the use case (text generation, embeddings, image classification, etc.).

IMPORTANT: Always provide complete, detailed responses. Include full code examples and finish your thoughts. Don't cut off mid-sentence or mid-code block. Ensure file structures, code samples, and explanations are comprehensive and actionable.

Be concise yet thorough, practical, and focus on actionable guidance. Use British English spelling and terminology throughout.";

/// Build the ordered message list for one generation request.
///
/// The window is taken over the raw history first and `system` entries are
/// dropped afterwards, so a stored `system` entry shrinks the window rather
/// than pulling in an older message.
pub fn assemble_prompt(history: &[ChatMessage], user_text: &str) -> Vec<PromptMessage> {
    let window_start = history.len().saturating_sub(HISTORY_WINDOW);

    let mut messages = Vec::with_capacity(HISTORY_WINDOW + 2);
    messages.push(PromptMessage::new(MessageRole::System, SYSTEM_PROMPT));
    messages.extend(
        history[window_start..]
            .iter()
            .filter(|msg| msg.role != MessageRole::System)
            .map(ChatMessage::to_prompt),
    );
    messages.push(PromptMessage::new(MessageRole::User, user_text));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(len: usize) -> Vec<ChatMessage> {
        (0..len)
            .map(|i| {
                let role = if i % 2 == 0 {
                    MessageRole::User
                } else {
                    MessageRole::Assistant
                };
                ChatMessage {
                    role,
                    content: format!("m{i}"),
                    timestamp: i as i64,
                }
            })
            .collect()
    }

    #[test]
    fn empty_history_yields_system_and_user_only() {
        let prompt = assemble_prompt(&[], "Build a todo app");
        assert_eq!(prompt.len(), 2);
        assert_eq!(prompt[0].role, MessageRole::System);
        assert_eq!(prompt[0].content, SYSTEM_PROMPT);
        assert_eq!(prompt[1], PromptMessage::new(MessageRole::User, "Build a todo app"));
    }

    #[test]
    fn prompt_length_is_window_plus_two() {
        for len in [0, 1, 5, 9, 10, 11, 12, 40] {
            let prompt = assemble_prompt(&history_of(len), "next");
            assert_eq!(prompt.len(), len.min(HISTORY_WINDOW) + 2, "history length {len}");
        }
    }

    #[test]
    fn twelve_messages_keep_the_most_recent_ten_in_order() {
        let prompt = assemble_prompt(&history_of(12), "new question");

        assert_eq!(prompt.len(), 12);
        assert_eq!(prompt[0].role, MessageRole::System);
        let window: Vec<&str> = prompt[1..11].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            window,
            vec!["m2", "m3", "m4", "m5", "m6", "m7", "m8", "m9", "m10", "m11"]
        );
        assert_eq!(prompt[11].role, MessageRole::User);
        assert_eq!(prompt[11].content, "new question");
    }

    #[test]
    fn stored_system_entries_are_excluded() {
        let mut history = history_of(4);
        history.insert(
            2,
            ChatMessage {
                role: MessageRole::System,
                content: "injected".to_string(),
                timestamp: 99,
            },
        );

        let prompt = assemble_prompt(&history, "hi");

        assert_eq!(prompt.len(), 6);
        assert_eq!(
            prompt.iter().filter(|m| m.role == MessageRole::System).count(),
            1
        );
        assert!(prompt.iter().all(|m| m.content != "injected"));
    }

    #[test]
    fn system_entry_inside_window_is_not_backfilled() {
        let mut history = history_of(10);
        history[9].role = MessageRole::System;
        let mut longer = history_of(1);
        longer.extend(history);

        // 11 stored entries: the window covers the last 10, one of which is a
        // system entry, so 9 history messages reach the prompt.
        let prompt = assemble_prompt(&longer, "hi");
        assert_eq!(prompt.len(), 9 + 2);
    }

    #[test]
    fn user_text_is_passed_verbatim() {
        let prompt = assemble_prompt(&[], "  padded  ");
        assert_eq!(prompt.last().unwrap().content, "  padded  ");
    }

    #[test]
    fn preamble_asks_for_british_english_and_model_picks() {
        assert!(SYSTEM_PROMPT.contains("recommend appropriate models like Llama 3.3"));
        assert!(SYSTEM_PROMPT.contains("Using British English in comments and user-facing text"));
        assert!(SYSTEM_PROMPT.ends_with("Use British English spelling and terminology throughout."));
    }
}
