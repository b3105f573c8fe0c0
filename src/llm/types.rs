use crate::recipe::{Contract, PromptPart, RenderedPrompt};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
    ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessageArgs,
    ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
    ImageDetail, ImageUrl, ResponseFormat, ResponseFormatJsonSchema,
};
use serde::{Deserialize, Serialize};

/// What the model is asked to produce: the output contract's name,
/// description and JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputContractDescription {
    pub name: String,
    pub description: String,
    pub schema: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub prompt: RenderedPrompt,
    pub output: OutputContractDescription,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub raw_output: String,
}

impl ModelReply {
    pub fn new(raw_output: impl Into<String>) -> Self {
        Self {
            raw_output: raw_output.into(),
        }
    }
}

impl From<&Contract> for OutputContractDescription {
    fn from(contract: &Contract) -> Self {
        Self {
            name: contract.name.to_string(),
            description: contract.description.to_string(),
            schema: contract.json_schema(),
        }
    }
}

impl OutputContractDescription {
    pub fn to_response_format(&self) -> ResponseFormat {
        ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: Some(self.description.clone()),
                name: self.name.clone(),
                schema: Some(self.schema.clone()),
                strict: Some(true),
            },
        }
    }
}

impl ModelRequest {
    pub fn to_openai_messages(
        &self,
        system_prompt: Option<&str>,
    ) -> Result<Vec<ChatCompletionRequestMessage>, crate::Error> {
        let mut messages = Vec::new();

        if let Some(system_prompt) = system_prompt.filter(|s| !s.is_empty()) {
            let msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(ChatCompletionRequestSystemMessageContent::Text(
                    system_prompt.to_string(),
                ))
                .build()
                .map_err(|e| {
                    crate::Error::internal(format!("Failed to build system message: {}", e))
                })?;
            messages.push(msg.into());
        }

        let parts: Vec<ChatCompletionRequestUserMessageContentPart> = self
            .prompt
            .parts
            .iter()
            .map(|part| match part {
                PromptPart::Text { text } => ChatCompletionRequestUserMessageContentPart::Text(
                    ChatCompletionRequestMessageContentPartText { text: text.clone() },
                ),
                PromptPart::Media { url } => {
                    ChatCompletionRequestUserMessageContentPart::ImageUrl(
                        ChatCompletionRequestMessageContentPartImage {
                            image_url: ImageUrl {
                                url: url.clone(),
                                detail: Some(ImageDetail::Auto),
                            },
                        },
                    )
                }
            })
            .collect();

        let msg = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(parts))
            .build()
            .map_err(|e| crate::Error::internal(format!("Failed to build user message: {}", e)))?;
        messages.push(msg.into());

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::schema::RECIPE_OUTPUT;
    use pretty_assertions::assert_eq;

    fn prompt_with_image() -> RenderedPrompt {
        RenderedPrompt {
            parts: vec![
                PromptPart::Text {
                    text: "Photo: ".to_string(),
                },
                PromptPart::Media {
                    url: "data:image/png;base64,iVBORw0KGgo=".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_output_description_from_contract() {
        let output = OutputContractDescription::from(&RECIPE_OUTPUT);
        assert_eq!(output.name, "generateRecipeFromPhotoOutput");
        assert_eq!(output.schema, RECIPE_OUTPUT.json_schema());
    }

    #[test]
    fn test_response_format_is_strict_json_schema() {
        let output = OutputContractDescription::from(&RECIPE_OUTPUT);
        match output.to_response_format() {
            ResponseFormat::JsonSchema { json_schema } => {
                assert_eq!(json_schema.strict, Some(true));
                assert_eq!(json_schema.name, "generateRecipeFromPhotoOutput");
            }
            other => panic!("unexpected response format: {:?}", other),
        }
    }

    #[test]
    fn test_messages_with_system_prompt() {
        let request = ModelRequest {
            prompt: prompt_with_image(),
            output: OutputContractDescription::from(&RECIPE_OUTPUT),
        };
        let messages = request.to_openai_messages(Some("Be brief")).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_image_part_keeps_data_uri() {
        let request = ModelRequest {
            prompt: prompt_with_image(),
            output: OutputContractDescription::from(&RECIPE_OUTPUT),
        };
        let messages = request.to_openai_messages(None).unwrap();
        assert_eq!(messages.len(), 1);

        let ChatCompletionRequestMessage::User(user) = &messages[0] else {
            panic!("expected a user message");
        };
        let ChatCompletionRequestUserMessageContent::Array(parts) = &user.content else {
            panic!("expected multi-part content");
        };
        assert_eq!(parts.len(), 2);
        match &parts[1] {
            ChatCompletionRequestUserMessageContentPart::ImageUrl(image) => {
                assert_eq!(image.image_url.url, "data:image/png;base64,iVBORw0KGgo=");
            }
            other => panic!("unexpected part: {:?}", other),
        }
    }
}
