//! OpenAI-compatible generation provider.
//!
//! Workers AI, local servers, and hosted OpenAI-style APIs all speak the same
//! chat completions protocol, so one provider covers them via a configurable
//! base URL. Uses [`async_openai`] for request/response types.

pub mod config;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use secrecy::ExposeSecret;

use colloquy_core::llm::provider::LlmProvider;
use colloquy_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, PromptMessage, Usage,
};

use self::config::OpenAiCompatConfig;

/// Provider for any OpenAI-compatible chat completions API.
///
/// Does not derive Debug: the `async_openai::Client` holds the API key.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.expose_secret())
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            provider_name: config.provider_name,
            model: config.model,
        }
    }

    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let messages = request.messages.iter().map(to_openai_message).collect();

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        }
    }
}

fn to_openai_message(msg: &PromptMessage) -> ChatCompletionRequestMessage {
    match msg.role {
        MessageRole::System => {
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
                name: None,
            })
        }
        MessageRole::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
            name: None,
        }),
        MessageRole::Assistant => {
            #[allow(deprecated)]
            ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                    msg.content.clone(),
                )),
                refusal: None,
                name: None,
                audio: None,
                tool_calls: None,
                function_call: None,
            })
        }
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let response = self
            .client
            .chat()
            .create(self.build_request(request))
            .await
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone());

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: response.model,
            usage,
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Invalid API key")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                LlmError::RateLimited {
                    retry_after_ms: None,
                }
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401) | Some(403) => LlmError::AuthenticationFailed,
            Some(429) => LlmError::RateLimited {
                retry_after_ms: None,
            },
            Some(_) => LlmError::Provider {
                message: err.to_string(),
            },
            None => LlmError::Unavailable(err.to_string()),
        },
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn provider() -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(config::workers_ai_defaults(
            "acct",
            SecretString::from("token".to_string()),
            "@cf/meta/llama-3.3-70b-instruct-fp8-fast",
        ))
    }

    fn request(model: &str) -> CompletionRequest {
        CompletionRequest {
            model: model.to_string(),
            messages: vec![
                PromptMessage::new(MessageRole::System, "be brief"),
                PromptMessage::new(MessageRole::User, "hi"),
                PromptMessage::new(MessageRole::Assistant, "hello"),
                PromptMessage::new(MessageRole::User, "Build a todo app"),
            ],
            max_tokens: 2048,
            temperature: Some(0.5),
        }
    }

    #[test]
    fn test_build_request_maps_roles_in_order() {
        let req = provider().build_request(&request("custom-model"));

        assert_eq!(req.model, "custom-model");
        assert_eq!(req.max_completion_tokens, Some(2048));
        assert_eq!(req.temperature, Some(0.5));
        assert_eq!(req.messages.len(), 4);
        assert!(matches!(req.messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(req.messages[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(req.messages[2], ChatCompletionRequestMessage::Assistant(_)));
        assert!(matches!(req.messages[3], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_build_request_falls_back_to_configured_model() {
        let req = provider().build_request(&request(""));
        assert_eq!(req.model, "@cf/meta/llama-3.3-70b-instruct-fp8-fast");
    }

    #[test]
    fn test_invalid_argument_maps_to_invalid_request() {
        let err = map_openai_error(async_openai::error::OpenAIError::InvalidArgument(
            "bad".to_string(),
        ));
        assert!(matches!(err, LlmError::InvalidRequest(ref m) if m == "bad"));
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(provider().name(), "workers-ai");
    }
}
