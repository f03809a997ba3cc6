//! `poemario add` command - merge one document into the archive
//!
//! Parses the document, obtains candidate keywords (live generator or a
//! pending-keywords file), canonicalizes and re-tiers them, builds the
//! entry, and rewrites the archive. Nothing is written until every
//! prior step has succeeded.
//!
//! Example usage:
//! - `poemario add textos/2025-12-24.txt`
//! - `poemario add textos/2025-12-24.txt --poet "..." --my-poem-title "..."`
//! - `poemario add textos/2025-12-24.txt --keywords-file scripts/pending_keywords.txt`

use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::debug;

use crate::cli::{AddArgs, Cli, OutputFormat};
use crate::commands::resolve_path;
use poemario_core::archive::{missing_quality_fields, Archive, ArchiveEntry};
use poemario_core::config::Config;
use poemario_core::document::{self, MetaKey, Metadata, Section};
use poemario_core::error::{PoemarioError, Result};
use poemario_core::generator::{self, KeywordGenerator, OpenAiGenerator};
use poemario_core::keywords::{canonicalize, retier, DedupePolicy, Keyword};

/// Execute the add command
pub fn execute(cli: &Cli, root: &Path, args: &AddArgs, start: Instant) -> Result<()> {
    let config = Config::discover(root)?;
    let path = resolve_path(root, &args.file);

    let (mut meta, sections) = document::parse_file(&path)?;
    apply_overrides(&mut meta, args);

    if cli.verbose {
        debug!(elapsed = ?start.elapsed(), "parse_document");
    }

    let analysis_text = sections
        .get(Section::Analysis)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| PoemarioError::MissingSection {
            label: Section::Analysis.label().to_string(),
        })?;

    let missing = missing_quality_fields(&meta);
    if !missing.is_empty() && !cli.quiet {
        eprintln!("warning: missing metadata: {}", missing.join(", "));
        eprintln!(
            "         add 'KEY: value' lines at the top of the file, or pass the matching --flags"
        );
    }

    let keywords = gather_keywords(root, args, &config, analysis_text, &meta)?;

    if cli.verbose {
        debug!(elapsed = ?start.elapsed(), keywords = keywords.len(), "canonicalize_keywords");
    }

    let file_ref = file_reference(root, &path);
    let entry = ArchiveEntry::build(&meta, &file_ref, keywords)?;

    let archive_path = config.archive_path(root);
    let mut archive = Archive::load(&archive_path)?;
    archive.merge(entry.clone())?;
    archive.save(&archive_path)?;

    if cli.verbose {
        debug!(elapsed = ?start.elapsed(), entries = archive.len(), "save_archive");
    }

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "entry": entry,
                "archive": archive_path.display().to_string(),
                "total_entries": archive.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!(
                "OK: added entry {} to {}",
                entry.date,
                archive_path.display()
            );
            if !cli.quiet {
                let top: Vec<&str> = entry
                    .keywords
                    .iter()
                    .filter(|k| k.weight == 3)
                    .take(5)
                    .map(|k| k.word.as_str())
                    .collect();
                println!("Top keywords (w=3): {}", top.join(", "));
                println!("Total keywords: {}", entry.keywords.len());
            }
        }
    }

    Ok(())
}

/// Obtain the final keyword list for the entry.
///
/// A pending-keywords file is a flat candidate list, merged with the
/// max-weight dedup policy; the live generator path keeps the first
/// occurrence before ranking. Both paths re-tier by rank position.
fn gather_keywords(
    root: &Path,
    args: &AddArgs,
    config: &Config,
    analysis_text: &str,
    meta: &Metadata,
) -> Result<Vec<Keyword>> {
    let (candidates, policy) = match &args.keywords_file {
        Some(path) => {
            let raw = fs::read_to_string(resolve_path(root, path))?;
            (generator::parse_candidates(&raw)?, DedupePolicy::MaxWeight)
        }
        None => {
            let model = args.model.as_deref().unwrap_or(&config.model);
            let client = OpenAiGenerator::from_env(model)?;
            (client.generate(analysis_text, meta)?, DedupePolicy::FirstWins)
        }
    };
    Ok(retier(&canonicalize(&candidates, policy)))
}

/// Apply CLI override flags on top of the parsed metadata
fn apply_overrides(meta: &mut Metadata, args: &AddArgs) {
    let overrides = [
        (MetaKey::Date, &args.date),
        (MetaKey::Poet, &args.poet),
        (MetaKey::PoemTitle, &args.poem_title),
        (MetaKey::PoemSnippet, &args.poem_snippet),
        (MetaKey::BookTitle, &args.book_title),
        (MetaKey::MyPoemTitle, &args.my_poem_title),
        (MetaKey::MyPoemSnippet, &args.my_poem_snippet),
    ];
    for (key, value) in overrides {
        if let Some(value) = value {
            meta.set(key, value.clone());
        }
    }
}

/// Archive-facing reference to the document: relative to the project
/// root when possible, with forward slashes
fn file_reference(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
