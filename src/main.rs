//! MediChat interactive terminal
//!
//! Run with: cargo run -- report1.pdf report2.pdf

use anyhow::Context;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medichat::providers::{EmbeddingProvider, OpenAiProvider, QdrantStore, VectorStore};
use medichat::{ChatConfig, Error, SessionPipeline, SessionState, UploadedDocument};

#[derive(Parser)]
#[command(
    name = "medichat",
    about = "Ask questions about your medical PDF documents",
    version
)]
struct Cli {
    /// PDF files to process at startup
    pdfs: Vec<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medichat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                      MediChat Pro                         ║
║        Medical Document Q&A with Vector Retrieval         ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let config = ChatConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.openai.embed_model);
    tracing::info!("  - Chat model: {}", config.openai.chat_model);
    tracing::info!("  - Collection: {}", config.qdrant.collection);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);

    let (embedder, chat) = OpenAiProvider::new(&config.openai)?.split();
    let store = QdrantStore::new(&config.qdrant)?;

    match store.health_check().await {
        Ok(true) => tracing::info!("Qdrant reachable at {}", config.qdrant.url),
        _ => {
            tracing::warn!("Qdrant not reachable at {}", config.qdrant.url);
            tracing::warn!("Set QDRANT_URL (and QDRANT_API_KEY for Qdrant Cloud)");
        }
    }
    match embedder.health_check().await {
        Ok(true) => tracing::info!("OpenAI API reachable"),
        _ => {
            tracing::warn!("OpenAI API not reachable or key rejected");
            tracing::warn!("Set OPENAI_API_KEY to a valid key");
        }
    }

    let pipeline = SessionPipeline::new(
        Arc::new(embedder),
        Arc::new(store),
        Arc::new(chat),
        &config,
    )?;
    let mut state = SessionState::new();
    let mut staged: Vec<UploadedDocument> = Vec::new();

    for path in &cli.pdfs {
        stage_file(&mut staged, path)?;
    }
    if !staged.is_empty() {
        process_staged(&pipeline, &mut state, &staged).await;
    }

    print_help();

    let stdin = std::io::stdin();
    loop {
        print!("{} ", style(">").cyan().bold());
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ') {
            Some((":load", path)) => {
                if let Err(e) = stage_file(&mut staged, &PathBuf::from(path.trim())) {
                    println!("{} {}", style("✗").red(), e);
                }
            }
            _ => match line {
                ":process" => {
                    if staged.is_empty() {
                        println!("No documents staged. Use :load <path> first.");
                    } else {
                        process_staged(&pipeline, &mut state, &staged).await;
                    }
                }
                ":history" => print_history(&state),
                ":help" => print_help(),
                ":quit" | ":exit" => break,
                question if question.starts_with(':') => {
                    println!("Unknown command. Type :help for the command list.");
                }
                question => ask(&pipeline, &mut state, question).await,
            },
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Read a PDF from disk into the staging area
fn stage_file(staged: &mut Vec<UploadedDocument>, path: &PathBuf) -> anyhow::Result<()> {
    let data = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    println!(
        "{} Staged {} ({} bytes)",
        style("📄").dim(),
        style(&filename).bold(),
        data.len()
    );
    staged.push(UploadedDocument { filename, data });
    Ok(())
}

async fn process_staged(
    pipeline: &SessionPipeline,
    state: &mut SessionState,
    staged: &[UploadedDocument],
) {
    let spinner = new_spinner("Processing documents...");
    match pipeline.process_documents(state, staged).await {
        Ok(outcome) => {
            spinner.finish_and_clear();
            println!(
                "{} Processed {} document(s) into {} chunks. Ask away!",
                style("✅").green(),
                outcome.documents,
                outcome.chunks
            );
        }
        Err(e) => {
            spinner.finish_and_clear();
            println!("{} Processing failed: {}", style("✗").red(), e);
        }
    }
}

async fn ask(pipeline: &SessionPipeline, state: &mut SessionState, question: &str) {
    let spinner = new_spinner("Thinking...");
    match pipeline.ask(state, question).await {
        Ok(answer) => {
            spinner.finish_and_clear();
            println!("\n{}\n", style(answer).green());
        }
        Err(e) if e.is_not_ready() => {
            spinner.finish_and_clear();
            println!("Please load and process documents first (:load <path>, then :process).");
        }
        Err(e) => {
            spinner.finish_and_clear();
            // The session stays usable after a failed question
            println!("{} {}", style("✗").red(), e);
            if let Error::Generation(_) | Error::Retrieval(_) = e {
                println!("Check your network connection and API credentials, then try again.");
            }
        }
    }
}

fn print_history(state: &SessionState) {
    if state.messages().is_empty() {
        println!("No conversation yet.");
        return;
    }
    for message in state.messages() {
        let role = match message.role {
            medichat::Role::User => style("you").cyan().bold(),
            medichat::Role::Assistant => style("medichat").green().bold(),
        };
        println!(
            "{} {}  {}",
            style(&message.timestamp).dim(),
            role,
            message.content
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  :load <path>   stage a PDF for processing");
    println!("  :process       build the index from staged PDFs");
    println!("  :history       show the conversation so far");
    println!("  :help          show this help");
    println!("  :quit          exit");
    println!("Anything else is treated as a question about your documents.\n");
}

fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
