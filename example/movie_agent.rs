//! Example: keyword-routed movie assistant
//! Run with: cargo run --bin movie_agent -- --query "Ticket timings for Avatar"

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use marquee::config::Settings;
use marquee::intents::{movie_router, MovieIntent};
use marquee::llms::{GeminiLLM, MockLLM};
use marquee::logging::init_tracing;
use marquee::router::Router;

#[derive(Parser, Debug)]
#[command(name = "movie_agent", about = "Ask about tickets, box office, or movie facts")]
struct Args {
    /// Query to route; may be repeated. Reads stdin lines when omitted.
    #[arg(short, long)]
    query: Vec<String>,

    /// Print the routing table as JSON and exit
    #[arg(long)]
    describe: bool,

    /// Print the routing table as a Graphviz digraph and exit
    #[arg(long)]
    dot: bool,

    /// Answer model-backed intents with a canned reply instead of calling Gemini
    #[arg(long)]
    offline: bool,
}

async fn answer(router: &Router<MovieIntent>, query: &str) {
    match router.route(query).await {
        Ok(result) => println!("[{}] {}", result.route, result.output),
        Err(e) => println!("⚠️ {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::from_env()?;
    init_tracing(&settings.log_level);

    let router = if args.offline || args.describe || args.dot {
        let llm = MockLLM::new().with_default_response("(offline) The model is not connected.");
        movie_router(Arc::new(llm))?
    } else {
        movie_router(Arc::new(GeminiLLM::from_settings(&settings)?))?
    };

    if args.describe {
        println!("{}", serde_json::to_string_pretty(&router.describe())?);
        return Ok(());
    }
    if args.dot {
        print!("{}", router.describe().to_dot());
        return Ok(());
    }

    if !args.query.is_empty() {
        for query in &args.query {
            answer(&router, query).await;
        }
        return Ok(());
    }

    println!("🎬 Ask about tickets, box office, or movie facts (Ctrl-D to quit).");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        answer(&router, query).await;
    }

    Ok(())
}
