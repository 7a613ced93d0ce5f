//! faqdesk CLI — search the FAQ corpus from the terminal.
//!
//! Calls `faqdesk-core` directly with no server overhead.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use faqdesk_core::corpus::FaqCorpus;
use faqdesk_core::search::{FaqIndex, DEFAULT_TOP_K};

/// faqdesk CLI — FAQ search from the terminal.
#[derive(Parser)]
#[command(name = "faq", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the FAQ corpus file
    #[arg(long, global = true, default_value = "faqs.json")]
    faqs: PathBuf,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the corpus for matching FAQ entries
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        limit: usize,
    },
    /// Show autocomplete suggestions for a partial query
    Suggest {
        /// Partial query
        query: String,
    },
}

fn load_index(path: &PathBuf) -> FaqIndex {
    let corpus = FaqCorpus::load(path).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    FaqIndex::build(&corpus)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("faqdesk_core=warn".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let index = load_index(&cli.faqs);

    match cli.command {
        Commands::Search { query, limit } => {
            let hits = index.search(&query, limit);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&hits).unwrap());
            } else {
                if hits.is_empty() {
                    eprintln!("No results for '{query}'");
                    std::process::exit(1);
                }
                for hit in &hits {
                    println!("{:>5.2}  {}", hit.score, hit.question);
                    println!("       {}", hit.answer);
                }
                eprintln!("\n{} results", hits.len());
            }
        }
        Commands::Suggest { query } => {
            let suggestions = index.suggest(&query);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&suggestions).unwrap());
            } else {
                if suggestions.is_empty() {
                    eprintln!("No suggestions for '{query}'");
                    std::process::exit(1);
                }
                for s in &suggestions {
                    println!("{s}");
                }
            }
        }
    }
}
