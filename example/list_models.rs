//! Example: list the Gemini models available to your API key
//! Run with: cargo run --bin list_models

use anyhow::Result;

use marquee::config::Settings;
use marquee::llms::{select_model, GeminiLLM};
use marquee::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env()?;
    init_tracing(&settings.log_level);

    let llm = GeminiLLM::from_settings(&settings)?;
    let models = llm.list_models().await?;

    println!("Available models:");
    for model in &models {
        println!("{}", model.name);
    }

    println!("✅ Would use: {}", select_model(&models, "gemini-pro")?);
    Ok(())
}
