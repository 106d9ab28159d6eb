//! faqcoach CLI: practice answering FAQ questions and get feedback.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::Overrides;

#[derive(Parser)]
#[command(name = "faqcoach", version, about = "Practice approved FAQ answers and get feedback")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive quiz: answer random questions and read the feedback
    Quiz {
        #[command(flatten)]
        overrides: Overrides,

        /// Seed the question picker for a reproducible sequence
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Evaluate one answer to one entry and print the feedback
    Check {
        #[command(flatten)]
        overrides: Overrides,

        /// Entry id in the FAQ file
        #[arg(long)]
        id: String,

        /// The answer to evaluate
        #[arg(long)]
        answer: String,

        /// Output format: text, html, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate an FAQ file
    Validate {
        /// Path to the FAQ file (.toml or .json)
        #[arg(long)]
        faq: PathBuf,
    },

    /// Create a starter config and FAQ file
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("faqcoach=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Quiz { overrides, seed } => commands::quiz::execute(overrides, seed).await,
        Commands::Check {
            overrides,
            id,
            answer,
            format,
        } => commands::check::execute(overrides, id, answer, format).await,
        Commands::Validate { faq } => commands::validate::execute(faq),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
