//! # Moked CLI (`moked`)
//!
//! Command-line front end for the FAQ matching engine. The engine itself
//! is stateless per query; the `chat` loop owns the session history.
//!
//! ## Usage
//!
//! ```bash
//! moked --config ./config/moked.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `moked check` | Fetch and parse the FAQ source, print corpus stats |
//! | `moked ask "<query>"` | Answer a single question and exit |
//! | `moked chat` | Interactive question/answer loop on stdin |

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use moked::config;
use moked::engine::FaqEngine;
use moked::source;

/// Moked — Hebrew FAQ matching engine combining fuzzy and semantic retrieval.
#[derive(Parser)]
#[command(
    name = "moked",
    about = "Moked — Hebrew FAQ matching engine combining fuzzy and semantic retrieval",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/moked.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and parse the FAQ source, then print corpus statistics.
    ///
    /// Reports record, variant, and link counts, and lists blocks that
    /// parsed with an empty question so authoring mistakes surface early.
    Check,

    /// Answer a single question and exit.
    Ask {
        /// The question text.
        query: String,
    },

    /// Interactive question/answer loop. Empty line or Ctrl-D exits.
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("moked=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    let raw = source::fetch_source(&cfg.source).await?;

    match cli.command {
        Commands::Check => {
            let corpus = moked::parse::parse(&raw);
            let variant_count: usize = corpus.records.iter().map(|r| r.variants.len()).sum();
            println!("records: {}", corpus.records.len());
            println!("variants: {}", variant_count);
            println!("links: {}", corpus.links.len());

            for (i, record) in corpus.records.iter().enumerate() {
                if record.question.is_empty() {
                    println!("warning: record {} has no question line", i);
                }
            }
        }
        Commands::Ask { query } => {
            let engine = FaqEngine::build(cfg.matching, &cfg.embedding, &raw).await?;
            let reply = engine.answer(&query).await;
            println!("{}", reply.text);
        }
        Commands::Chat => {
            let engine = FaqEngine::build(cfg.matching, &cfg.embedding, &raw).await?;
            run_chat(&engine).await?;
        }
    }

    Ok(())
}

/// Interactive loop. The history log lives here, with the caller — the
/// engine stays stateless per call.
async fn run_chat(engine: &FaqEngine) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut history: Vec<(String, String)> = Vec::new();

    println!("איך אפשר לעזור? (שורה ריקה ליציאה)");
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            break;
        }

        let reply = engine.answer(query).await;
        println!("{}\n", reply.text);

        history.push((query.to_string(), reply.text));
    }

    if !history.is_empty() {
        println!("({} שאלות בשיחה זו)", history.len());
    }
    Ok(())
}
