//! Example: answer questions about local text files
//! Run with: cargo run --bin rag_qa -- --file notes.txt --question "What do sponsors get?"

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use marquee::config::Settings;
use marquee::document_loaders::TextLoader;
use marquee::embeddings::HashingEmbeddings;
use marquee::handlers::RetrievalQaHandler;
use marquee::llms::{GeminiLLM, MockLLM};
use marquee::logging::init_tracing;
use marquee::text_splitters::CharacterTextSplitter;
use marquee::traits::{DocumentLoader, Handler, LanguageModel, TextSplitter};
use marquee::vectorstores::MemoryVectorStore;

#[derive(Parser, Debug)]
#[command(name = "rag_qa", about = "Index text files and answer questions about them")]
struct Args {
    /// Text file to index; may be repeated
    #[arg(short, long, required = true)]
    file: Vec<PathBuf>,

    /// Question to answer; may be repeated. Reads stdin lines when omitted.
    #[arg(short, long)]
    question: Vec<String>,

    #[arg(long, default_value_t = 1000)]
    chunk_size: usize,

    #[arg(long, default_value_t = 200)]
    chunk_overlap: usize,

    /// Chunks retrieved per question
    #[arg(long, default_value_t = 4)]
    top_k: usize,

    /// Answer with a canned reply instead of calling Gemini
    #[arg(long)]
    offline: bool,
}

async fn build_index(args: &Args) -> Result<MemoryVectorStore> {
    let mut documents = Vec::new();
    for path in &args.file {
        documents.extend(TextLoader::new(path).load().await?);
    }

    let splitter = CharacterTextSplitter::new(args.chunk_size, args.chunk_overlap)?;
    let chunks = splitter.split_documents(documents)?;

    let store = MemoryVectorStore::new(HashingEmbeddings::default()).with_top_k(args.top_k);
    let indexed = store.add_documents(chunks).await?;
    println!("🗂️ Indexed {} chunks from {} file(s).", indexed, args.file.len());
    Ok(store)
}

async fn run<L: LanguageModel + 'static>(args: &Args, llm: Arc<L>) -> Result<()> {
    let handler = RetrievalQaHandler::new(build_index(args).await?, llm);

    if !args.question.is_empty() {
        for question in &args.question {
            answer(&handler, question).await;
        }
        return Ok(());
    }

    println!("📄 Ask a question about your documents (Ctrl-D to quit).");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        answer(&handler, question).await;
    }
    Ok(())
}

async fn answer(handler: &impl Handler, question: &str) {
    match handler.handle(question).await {
        Ok(reply) => println!("{}", reply),
        Err(e) => println!("⚠️ {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::from_env()?;
    init_tracing(&settings.log_level);

    if args.offline {
        let llm = MockLLM::new().with_default_response("(offline) The model is not connected.");
        run(&args, Arc::new(llm)).await
    } else {
        run(&args, Arc::new(GeminiLLM::from_settings(&settings)?)).await
    }
}
