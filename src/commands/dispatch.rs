//! Command dispatch logic for poemario

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use crate::cli::{Cli, Commands};
use crate::commands;
use poemario_core::error::{PoemarioError, Result};

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    // Determine the project root
    let root = cli
        .root
        .clone()
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if cli.verbose {
        tracing::debug!(elapsed = ?start.elapsed(), root = %root.display(), "resolve_root");
    }

    match &cli.command {
        None => Err(PoemarioError::UsageError(
            "no command given (try `poemario add <file>` or --help)".to_string(),
        )),

        Some(Commands::Add(args)) => commands::add::execute(cli, &root, args, start),

        Some(Commands::Keywords(args)) => commands::keywords::execute(cli, &root, args, start),

        Some(Commands::Check { file }) => commands::check::execute(cli, &root, file),
    }
}
