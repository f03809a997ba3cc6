//! `poemario keywords` command - candidate keyword list for review
//!
//! Sends the whole document to the generator under the standing system
//! instruction and writes the cleaned candidate list to a review file,
//! backing up any previous output first. Weights are clamped and
//! deduplicated but not re-tiered; re-tiering happens when the list is
//! consumed by `poemario add --keywords-file`.

use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::debug;

use crate::cli::{Cli, KeywordsArgs, OutputFormat};
use crate::commands::resolve_path;
use poemario_core::config::Config;
use poemario_core::error::{PoemarioError, Result};
use poemario_core::generator::OpenAiGenerator;
use poemario_core::keywords::{canonicalize, DedupePolicy};

/// Execute the keywords command
pub fn execute(cli: &Cli, root: &Path, args: &KeywordsArgs, start: Instant) -> Result<()> {
    let config = Config::discover(root)?;
    let input = resolve_path(root, &args.input);
    let output = resolve_path(root, &args.output);

    if !input.is_file() {
        return Err(PoemarioError::DocumentNotFound { path: input });
    }
    let text = fs::read_to_string(&input)?;
    if text.trim().is_empty() {
        return Err(PoemarioError::Other(format!(
            "input file is empty: {}",
            input.display()
        )));
    }

    let model = args.model.as_deref().unwrap_or(&config.model);
    let client = OpenAiGenerator::from_env(model)?;
    let candidates = client.generate_from_document(&text)?;
    let keywords = canonicalize(&candidates, DedupePolicy::MaxWeight);

    if cli.verbose {
        debug!(elapsed = ?start.elapsed(), keywords = keywords.len(), "generate_keywords");
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    backup_existing(&output)?;

    let mut content = serde_json::to_string_pretty(&keywords)?;
    content.push('\n');
    fs::write(&output, content)?;

    match cli.format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "output": output.display().to_string(),
                "keywords": keywords,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Human => {
            println!("OK: {} keywords -> {}", keywords.len(), output.display());
        }
    }

    Ok(())
}

/// Keep a timestamped copy of a previous output file before overwriting
fn backup_existing(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let name = format!(
        "{}.bak-{}",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        stamp
    );
    fs::copy(path, path.with_file_name(name))?;
    Ok(())
}
