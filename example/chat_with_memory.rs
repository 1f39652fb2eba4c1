//! Example: chat with per-session memory
//! Run with: cargo run --bin chat_with_memory

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use marquee::config::Settings;
use marquee::llms::GeminiLLM;
use marquee::logging::init_tracing;
use marquee::memory::{format_reply, ConversationChain, SessionStore};

#[derive(Parser, Debug)]
#[command(name = "chat_with_memory", about = "Talk about movies; the assistant remembers the conversation")]
struct Args {
    /// Session to continue; a new one is started when omitted
    #[arg(long)]
    session: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::from_env()?;
    init_tracing(&settings.log_level);

    let store = Arc::new(SessionStore::new());
    let chain = ConversationChain::new(GeminiLLM::from_settings(&settings)?, store.clone());
    let session_id = args.session.unwrap_or_else(|| Uuid::new_v4().to_string());

    println!("🎬 Ask me about movies. Type /clear to forget, Ctrl-D to quit. (session {session_id})");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "/clear" {
            store.clear(&session_id)?;
            println!("🧹 Chat cleared.");
            continue;
        }

        match chain.chat(&session_id, input).await {
            Ok(reply) => println!("{}", format_reply(&reply)),
            Err(e) => println!("⚠️ {}", e),
        }
    }

    Ok(())
}
