//! Reply texts used when the provider gives nothing usable.

/// Reply used when the provider succeeds but returns no text.
pub const EMPTY_REPLY: &str = "Sorry, I couldn't generate a response.";

/// First line of every offline fallback reply.
pub const FALLBACK_HEADER: &str = "[Offline response - inference provider unavailable]";

/// Deterministic reply used when the provider fails or is unreachable.
///
/// Echoes the user's request and sketches a generic Workers architecture so
/// the conversation can carry on without inference.
pub fn fallback_reply(user_text: &str) -> String {
    format!(
        r#"{FALLBACK_HEADER}

Based on your request: "{user_text}"

Here's a suggested architecture for your Cloudflare Workers application:

**Architecture:**
- Cloudflare Workers for serverless compute
- Workers AI with Llama 3.3 for LLM inference
- Durable Objects for state management
- Static Assets for serving the UI

**File Structure:**
```
my-app/
├── src/
│   └── index.ts (Worker entry point)
├── public/
│   └── index.html (Frontend UI)
└── wrangler.jsonc (Configuration)
```

**Next Steps:**
1. Define your data models
2. Implement the Worker API routes
3. Create the Durable Object for state
4. Build the frontend interface

To get real answers, configure a generation provider in config.toml and set its API key."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_echoes_user_text() {
        let reply = fallback_reply("Build a todo app");
        assert!(reply.starts_with(FALLBACK_HEADER));
        assert!(reply.contains("Based on your request: \"Build a todo app\""));
        assert!(reply.contains("**Architecture:**"));
    }

    #[test]
    fn fallback_is_deterministic() {
        assert_eq!(fallback_reply("same"), fallback_reply("same"));
        assert_ne!(fallback_reply("one"), fallback_reply("two"));
    }
}
