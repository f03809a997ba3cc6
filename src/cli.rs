//! CLI argument parsing for poemario
//!
//! Global flags: --root, --format, --quiet, --verbose, --log-level,
//! --log-json

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub use poemario_core::format::OutputFormat;

/// Poemario - chronological archive builder for an annotated poem log
#[derive(Parser, Debug)]
#[command(name = "poemario")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level filter (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a document, generate keywords, and merge it into the archive
    Add(AddArgs),

    /// Generate a candidate keyword list into a review file
    Keywords(KeywordsArgs),

    /// Parse a document and report what was extracted, without writing
    Check {
        /// Path to the document (.txt)
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Path to the document (.txt), e.g. textos/2025-12-24.txt
    pub file: PathBuf,

    /// Override the document date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Override the cited poet
    #[arg(long)]
    pub poet: Option<String>,

    /// Override the cited poem title
    #[arg(long)]
    pub poem_title: Option<String>,

    /// Override the cited poem snippet
    #[arg(long)]
    pub poem_snippet: Option<String>,

    /// Override the book title
    #[arg(long)]
    pub book_title: Option<String>,

    /// Override the title of the author's own poem
    #[arg(long)]
    pub my_poem_title: Option<String>,

    /// Override the snippet of the author's own poem
    #[arg(long)]
    pub my_poem_snippet: Option<String>,

    /// Read keyword candidates from a JSON file instead of calling the
    /// generator
    #[arg(long)]
    pub keywords_file: Option<PathBuf>,

    /// Generator model
    #[arg(long, env = "OPENAI_MODEL")]
    pub model: Option<String>,
}

#[derive(Args, Debug)]
pub struct KeywordsArgs {
    /// Path to the document (.txt)
    #[arg(long)]
    pub input: PathBuf,

    /// Where to write the candidate list (e.g. scripts/pending_keywords.txt)
    #[arg(long)]
    pub output: PathBuf,

    /// Generator model
    #[arg(long, env = "OPENAI_MODEL")]
    pub model: Option<String>,
}

/// Parse output format from string
fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}
