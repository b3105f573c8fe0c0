use snap_recipe::{
    config::{Config, LlmConfig, LogsConfig, ServerConfig},
    recipe::{EncodedImage, RecipeSchema},
};

pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgo=";

pub const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub const TOMATO_SOUP_REPLY: &str = r#"{
    "recipeName": "Tomato Soup",
    "ingredients": ["tomato", "salt"],
    "instructions": ["Boil tomatoes", "Blend", "Season"],
    "servingSize": "2"
}"#;

pub const INCOMPLETE_REPLY: &str = r#"{"recipeName": "X"}"#;

pub fn tomato_soup() -> RecipeSchema {
    RecipeSchema {
        recipe_name: "Tomato Soup".to_string(),
        ingredients: vec!["tomato".to_string(), "salt".to_string()],
        instructions: vec![
            "Boil tomatoes".to_string(),
            "Blend".to_string(),
            "Season".to_string(),
        ],
        serving_size: "2".to_string(),
    }
}

pub fn png_photo() -> EncodedImage {
    EncodedImage::from_data_uri(PNG_DATA_URI).expect("valid test data URI")
}

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 1024 * 1024,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        llm: LlmConfig {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: "test-api-key".to_string(),
            model: "gpt-4o-mini".to_string(),
            system_prompt: None,
            temperature: 0.4,
            max_tokens: None,
        },
    }
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 9090
  logs:
    level: "debug"

llm:
  provider: "openai"
  base_url: "http://localhost:11434/v1"
  api_key: "test-api-key"
  model: "gpt-4o-mini"
  system_prompt: "You are a chef."
"#;

/// Minimal configuration relying on defaults
pub const MINIMAL_CONFIG_YAML: &str = r#"
llm:
  model: "gpt-4o-mini"
"#;
