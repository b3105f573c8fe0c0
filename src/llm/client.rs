use super::types::*;
use crate::{Error, Result, config::LlmConfig};
use async_openai::{Client, config::OpenAIConfig, types as openai_types};
use async_trait::async_trait;
use tracing::{debug, warn};

/// The generative model, seen as an opaque capability: submit a prompt plus
/// an output contract, get raw structured output back or fail.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, request: ModelRequest) -> Result<ModelReply>;
}

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    system_prompt: Option<String>,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key);

        if !config.base_url.is_empty() {
            openai_config = openai_config.with_api_base(config.base_url);
        }

        let client = Client::with_config(openai_config);

        Self {
            client,
            model: config.model,
            system_prompt: config.system_prompt,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn generate(&self, request: ModelRequest) -> Result<ModelReply> {
        debug!(
            "Creating completion for '{}' with {} prompt parts ({} images)",
            request.output.name,
            request.prompt.parts.len(),
            request.prompt.media_count()
        );

        let messages = request.to_openai_messages(self.system_prompt.as_deref())?;

        let mut request_builder = openai_types::CreateChatCompletionRequestArgs::default();
        request_builder
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .response_format(request.output.to_response_format());

        if let Some(max_tokens) = self.max_tokens {
            request_builder.max_completion_tokens(max_tokens);
        }

        let openai_request = request_builder
            .build()
            .map_err(|e| Error::internal(format!("Failed to build completion request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(openai_request)
            .await
            .map_err(|e| {
                warn!("Model call for '{}' failed: {}", request.output.name, e);
                Error::model_unavailable(e.to_string())
            })?;

        debug!(
            "Received completion response with {} choices",
            response.choices.len()
        );

        // A missing message body is left for contract validation to reject.
        let raw_output = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(ModelReply { raw_output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_config() -> LlmConfig {
        LlmConfig {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: "test-api-key".to_string(),
            model: "gpt-4o-mini".to_string(),
            system_prompt: None,
            temperature: 0.4,
            max_tokens: None,
        }
    }

    #[test]
    fn test_openai_client_creation() {
        let client = OpenAiClient::new(create_test_config());
        assert_eq!(client.model(), "gpt-4o-mini");
        assert_eq!(client.temperature, 0.4);
    }

    #[test]
    fn test_openai_client_with_empty_base_url() {
        let mut config = create_test_config();
        config.base_url = String::new();
        config.system_prompt = Some("You are a chef".to_string());

        let client = OpenAiClient::new(config);
        assert_eq!(client.system_prompt.as_deref(), Some("You are a chef"));
    }
}
