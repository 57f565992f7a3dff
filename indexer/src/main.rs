use anyhow::Result;
use clap::{Parser, Subcommand};
use indexer::build_vocabulary;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the word vocabulary used to featurize documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a vocabulary from JSON/JSONL corpus files or a directory of them
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// Output vocabulary directory
        #[arg(long)]
        output: PathBuf,
        /// Drop tokens seen fewer times than this across the corpus
        #[arg(long, default_value_t = 1)]
        min_count: u64,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, min_count } => {
            let meta = build_vocabulary(&input, &output, min_count)?;
            tracing::info!(output = %output.display(), num_words = meta.num_words, "vocabulary written");
            Ok(())
        }
    }
}
