//! Generation provider implementations.
//!
//! [`create_provider`] picks the provider described by the `[generation]`
//! config section and wraps it in a [`BoxLlmProvider`].

pub mod offline;
pub mod openai_compat;

use secrecy::SecretString;
use tracing::{info, warn};

use colloquy_core::llm::box_provider::BoxLlmProvider;
use colloquy_types::config::GenerationConfig;
use colloquy_types::llm::ProviderType;

use self::offline::OfflineProvider;
use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{custom_endpoint, workers_ai_defaults};

/// Build the configured provider, reading the API key from the environment
/// variable named by `config.api_key_env`.
pub fn create_provider(config: &GenerationConfig) -> BoxLlmProvider {
    let api_key = std::env::var(&config.api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(SecretString::from);
    build_provider(config, api_key)
}

/// Build the configured provider from an already-resolved API key.
///
/// Never fails: a remote provider that is missing its key or endpoint is
/// replaced by [`OfflineProvider`] with a warning, so the service still
/// answers every turn with the fallback reply.
pub fn build_provider(config: &GenerationConfig, api_key: Option<SecretString>) -> BoxLlmProvider {
    match config.provider {
        ProviderType::Offline => {
            info!("Generation provider set to offline");
            BoxLlmProvider::new(OfflineProvider)
        }
        ProviderType::OpenAiCompatible => {
            let Some(api_key) = api_key else {
                warn!(
                    env = %config.api_key_env,
                    "No API key found, running with the offline provider"
                );
                return BoxLlmProvider::new(OfflineProvider);
            };

            let oai_config = match (config.base_url.as_deref(), config.account_id.as_deref()) {
                (Some(base_url), _) => custom_endpoint(base_url, api_key, &config.model),
                (None, Some(account_id)) => workers_ai_defaults(account_id, api_key, &config.model),
                (None, None) => {
                    warn!(
                        "generation.base_url and generation.account_id are both unset, running with the offline provider"
                    );
                    return BoxLlmProvider::new(OfflineProvider);
                }
            };

            info!(
                provider = %oai_config.provider_name,
                base_url = %oai_config.base_url,
                model = %oai_config.model,
                "Generation provider configured"
            );
            BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai_config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> Option<SecretString> {
        Some(SecretString::from("token".to_string()))
    }

    #[test]
    fn test_offline_provider_selected_explicitly() {
        let config = GenerationConfig {
            provider: ProviderType::Offline,
            ..Default::default()
        };
        assert_eq!(build_provider(&config, key()).name(), "offline");
    }

    #[test]
    fn test_missing_key_falls_back_to_offline() {
        let config = GenerationConfig {
            account_id: Some("acct".to_string()),
            ..Default::default()
        };
        assert_eq!(build_provider(&config, None).name(), "offline");
    }

    #[test]
    fn test_missing_endpoint_falls_back_to_offline() {
        assert_eq!(build_provider(&GenerationConfig::default(), key()).name(), "offline");
    }

    #[test]
    fn test_account_id_selects_workers_ai() {
        let config = GenerationConfig {
            account_id: Some("acct".to_string()),
            ..Default::default()
        };
        assert_eq!(build_provider(&config, key()).name(), "workers-ai");
    }

    #[test]
    fn test_base_url_wins_over_account_id() {
        let config = GenerationConfig {
            base_url: Some("http://localhost:11434/v1".to_string()),
            account_id: Some("acct".to_string()),
            ..Default::default()
        };
        assert_eq!(build_provider(&config, key()).name(), "openai-compatible");
    }

    #[tokio::test]
    async fn test_offline_provider_reports_unavailable() {
        use colloquy_types::llm::{CompletionRequest, LlmError};

        let provider = build_provider(
            &GenerationConfig {
                provider: ProviderType::Offline,
                ..Default::default()
            },
            None,
        );
        let request = CompletionRequest {
            model: "m".to_string(),
            messages: Vec::new(),
            max_tokens: 16,
            temperature: None,
        };
        assert!(matches!(
            provider.complete(&request).await,
            Err(LlmError::Unavailable(_))
        ));
    }
}
