//! `poemario check` command - parse-only diagnostic
//!
//! Reports the extracted metadata, which sections were found, and the
//! advisory list of missing quality fields. Reads only the document;
//! writes nothing and never calls the generator.

use std::path::Path;

use crate::cli::{Cli, OutputFormat};
use crate::commands::resolve_path;
use poemario_core::archive::missing_quality_fields;
use poemario_core::document::{self, Section};
use poemario_core::error::Result;

/// Execute the check command
pub fn execute(cli: &Cli, root: &Path, file: &Path) -> Result<()> {
    let path = resolve_path(root, file);
    let (meta, sections) = document::parse_file(&path)?;

    let missing = missing_quality_fields(&meta);
    let present: Vec<&str> = Section::ALL
        .iter()
        .filter(|section| sections.get(**section).is_some())
        .map(|section| section.label())
        .collect();

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "file": path.display().to_string(),
                "metadata": {
                    "date": meta.date,
                    "poet": meta.poet,
                    "poem_title": meta.poem_title,
                    "poem_snippet": meta.poem_snippet,
                    "book_title": meta.book_title,
                    "my_poem_title": meta.my_poem_title,
                    "my_poem_snippet": meta.my_poem_snippet,
                },
                "sections": present,
                "missing": missing,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!("file: {}", path.display());
            println!("date: {}", meta.date.as_deref().unwrap_or("(unset)"));
            if present.is_empty() {
                println!("sections: (none)");
            } else {
                println!("sections: {}", present.join(", "));
            }
            if missing.is_empty() {
                println!("metadata: complete");
            } else {
                println!("missing: {}", missing.join(", "));
            }
        }
    }

    Ok(())
}
