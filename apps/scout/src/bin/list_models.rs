//! Lists the models visible to the configured API key.

use anyhow::Result;
use tracing::info;

use scout::config::Config;
use scout::llm_client::GeminiClient;
use scout::logging;

const GENERATE_METHOD: &str = "generateContent";

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.rust_log);

    let client = GeminiClient::from_config(&config)?;
    info!("Listing models from {}", config.api_base);

    println!("Listing models...");
    for model in client.list_models().await? {
        let marker = if model
            .supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_METHOD)
        {
            ""
        } else {
            " (no generateContent)"
        };
        println!(" - {}{marker}", model.name);
    }

    Ok(())
}
