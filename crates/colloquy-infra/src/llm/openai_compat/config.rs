//! Connection settings for OpenAI-compatible endpoints.

use secrecy::SecretString;

/// Configuration for an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Name reported in logs (e.g. "workers-ai").
    pub provider_name: String,
    /// Base URL of the chat completions API, without `/chat/completions`.
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request does not name one.
    pub model: String,
}

/// Cloudflare Workers AI through its OpenAI-compatible endpoint.
///
/// Base URL: `https://api.cloudflare.com/client/v4/accounts/{account_id}/ai/v1`
pub fn workers_ai_defaults(account_id: &str, api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "workers-ai".into(),
        base_url: format!("https://api.cloudflare.com/client/v4/accounts/{account_id}/ai/v1"),
        api_key,
        model: model.into(),
    }
}

/// Any other OpenAI-compatible endpoint at an explicit base URL.
pub fn custom_endpoint(base_url: &str, api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai-compatible".into(),
        base_url: base_url.trim_end_matches('/').to_string(),
        api_key,
        model: model.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_workers_ai_base_url() {
        let config = workers_ai_defaults(
            "abc123",
            SecretString::from("token".to_string()),
            "@cf/meta/llama-3.3-70b-instruct-fp8-fast",
        );
        assert_eq!(config.provider_name, "workers-ai");
        assert_eq!(
            config.base_url,
            "https://api.cloudflare.com/client/v4/accounts/abc123/ai/v1"
        );
        assert_eq!(config.api_key.expose_secret(), "token");
    }

    #[test]
    fn test_custom_endpoint_trims_trailing_slash() {
        let config = custom_endpoint(
            "http://localhost:11434/v1/",
            SecretString::from("unused".to_string()),
            "llama3",
        );
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.model, "llama3");
    }
}
