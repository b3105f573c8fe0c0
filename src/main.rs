use anyhow::{Result, anyhow};
use snap_recipe::{config, server};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Builds the log filter from `RUST_LOG`-style directives, e.g. `info` or
/// `snap_recipe=debug,tower_http=info`.
fn log_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| anyhow!("Invalid log filter '{}': {}", directives, e))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration comes first so it can pick the log level
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());
    let filter = match log_filter(&directives) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    if config.llm.api_key.is_empty() {
        warn!("No API key configured for provider '{}'", config.llm.provider);
    }
    info!(
        model = %config.llm.model,
        provider = %config.llm.provider,
        max_upload_bytes = config.server.max_upload_bytes,
        "Starting snap-recipe with log filter '{}'",
        directives
    );

    server::run(config).await?;

    Ok(())
}
