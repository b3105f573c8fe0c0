mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(&config_path).await?;
    parse(&config_str, env::var("OPENAI_API_KEY").ok())
}

/// Parses a YAML document, falling back to `env_api_key` when the file leaves
/// `llm.api_key` empty.
pub fn parse(config_str: &str, env_api_key: Option<String>) -> Result<Config> {
    let mut config: Config = serde_yaml::from_str(config_str)?;

    if config.llm.api_key.is_empty() {
        config.llm.api_key = env_api_key.unwrap_or_default();
    }
    if config.llm.model.trim().is_empty() {
        return Err(Error::config("llm.model must not be empty"));
    }

    Ok(config)
}
