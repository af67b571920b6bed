//! Global configuration types for Colloquy.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! HTTP listener, the session store backend, the generation provider, and the
//! per-session actor limits. Every field has a default, so an empty file is a
//! valid configuration.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderType;

/// Top-level configuration, loaded from `~/.colloquy/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub sessions: SessionConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory of static assets served for non-API paths.
    #[serde(default = "default_web_dir")]
    pub web_dir: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_web_dir() -> String {
    "public".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            web_dir: default_web_dir(),
        }
    }
}

/// Which session store implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

/// Session store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Overrides the default `sqlite://<data_dir>/colloquy.db` location.
    #[serde(default)]
    pub database_url: Option<String>,
}

/// Generation provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub provider: ProviderType,
    /// Base URL of the OpenAI-compatible endpoint. `None` selects the
    /// Workers AI endpoint built from `account_id`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Cloudflare account id, used when `base_url` is unset.
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f64>,
}

fn default_model() -> String {
    "@cf/meta/llama-3.3-70b-instruct-fp8-fast".to_string()
}

fn default_api_key_env() -> String {
    "COLLOQUY_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::default(),
            base_url: None,
            account_id: None,
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: None,
        }
    }
}

/// Per-session actor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds an idle session actor waits for a command before exiting.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Bound of each session actor's command queue.
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
}

fn default_idle_timeout_secs() -> u64 {
    300
}

fn default_mailbox_capacity() -> usize {
    64
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            mailbox_capacity: default_mailbox_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.generation.provider, ProviderType::OpenAiCompatible);
        assert_eq!(config.generation.max_tokens, 2048);
        assert_eq!(config.sessions.idle_timeout_secs, 300);
    }

    #[test]
    fn test_global_config_deserialize_empty() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(
            config.generation.model,
            "@cf/meta/llama-3.3-70b-instruct-fp8-fast"
        );
        assert_eq!(config.sessions.mailbox_capacity, 64);
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
[server]
port = 9000

[storage]
backend = "memory"

[generation]
provider = "offline"
max_tokens = 512
temperature = 0.2

[sessions]
idle_timeout_secs = 5
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.web_dir, "public");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.generation.provider, ProviderType::Offline);
        assert_eq!(config.generation.max_tokens, 512);
        assert_eq!(config.generation.temperature, Some(0.2));
        assert_eq!(config.sessions.idle_timeout_secs, 5);
        assert_eq!(config.sessions.mailbox_capacity, 64);
    }
}
