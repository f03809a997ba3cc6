//! Archive entry construction and validation

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::Metadata;
use crate::error::{PoemarioError, Result};
use crate::keywords::Keyword;

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("hardcoded regex"))
}

/// Fields describing the cited poem under analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub poet: String,
    #[serde(default)]
    pub poem_title: String,
    #[serde(default)]
    pub poem_snippet: String,
    #[serde(default)]
    pub book_title: String,
}

/// One persisted record of the archive, keyed uniquely by date.
///
/// Field names match the persisted JSON exactly; older entries missing
/// a field deserialize with empty defaults (no migration).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub date: String,
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub my_poem_title: String,
    #[serde(default)]
    pub my_poem_snippet: String,
    #[serde(default)]
    pub analysis: Analysis,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
}

impl ArchiveEntry {
    /// Build an entry from parsed metadata, a file reference, and the
    /// final keyword list.
    ///
    /// Fails when the date is absent or not exactly `YYYY-MM-DD`.
    /// Every other field defaults to an empty string.
    pub fn build(meta: &Metadata, file_ref: &str, keywords: Vec<Keyword>) -> Result<ArchiveEntry> {
        let date = field(&meta.date);
        if !date_re().is_match(&date) {
            return Err(PoemarioError::InvalidDate { value: date });
        }
        let month = date[..7].to_string();

        Ok(ArchiveEntry {
            date,
            month,
            file: file_ref.to_string(),
            my_poem_title: field(&meta.my_poem_title),
            my_poem_snippet: field(&meta.my_poem_snippet),
            analysis: Analysis {
                poet: field(&meta.poet),
                poem_title: field(&meta.poem_title),
                poem_snippet: field(&meta.poem_snippet),
                book_title: field(&meta.book_title),
            },
            keywords,
        })
    }
}

fn field(value: &Option<String>) -> String {
    value.as_deref().unwrap_or("").trim().to_string()
}

/// Advisory check: which of the fields that make an entry searchable
/// are blank. Reported to the user, never a build failure.
pub fn missing_quality_fields(meta: &Metadata) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if field(&meta.my_poem_title).is_empty() {
        missing.push("my_poem_title");
    }
    if field(&meta.poet).is_empty() {
        missing.push("poet");
    }
    if field(&meta.poem_title).is_empty() {
        missing.push("poem_title");
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta_with_date(date: &str) -> Metadata {
        Metadata {
            date: Some(date.to_string()),
            ..Metadata::default()
        }
    }

    #[test]
    fn test_build_derives_month() {
        let entry = ArchiveEntry::build(&meta_with_date("2025-03-10"), "textos/2025-03-10.txt", vec![])
            .unwrap();
        assert_eq!(entry.month, "2025-03");
        assert_eq!(entry.file, "textos/2025-03-10.txt");
    }

    #[test]
    fn test_build_defaults_absent_fields_to_empty() {
        let entry = ArchiveEntry::build(&meta_with_date("2025-03-10"), "f.txt", vec![]).unwrap();
        assert_eq!(entry.my_poem_title, "");
        assert_eq!(entry.analysis.poet, "");
        assert_eq!(entry.analysis.book_title, "");
    }

    #[test]
    fn test_build_trims_fields() {
        let mut meta = meta_with_date(" 2025-03-10 ");
        meta.poet = Some("  Antonio Machado ".to_string());
        let entry = ArchiveEntry::build(&meta, "f.txt", vec![]).unwrap();
        assert_eq!(entry.date, "2025-03-10");
        assert_eq!(entry.analysis.poet, "Antonio Machado");
    }

    #[test]
    fn test_build_rejects_bad_dates() {
        for bad in ["", "10-03-2025", "2025-3-10", "2025-03-10x", "hoy"] {
            let err = ArchiveEntry::build(&meta_with_date(bad), "f.txt", vec![]).unwrap_err();
            assert!(matches!(err, PoemarioError::InvalidDate { .. }), "{bad}");
        }
        let err = ArchiveEntry::build(&Metadata::default(), "f.txt", vec![]).unwrap_err();
        assert!(matches!(err, PoemarioError::InvalidDate { .. }));
    }

    #[test]
    fn test_serialized_field_names() {
        let entry =
            ArchiveEntry::build(&meta_with_date("2025-03-10"), "textos/2025-03-10.txt", vec![])
                .unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        for key in ["date", "month", "file", "my_poem_title", "my_poem_snippet", "analysis", "keywords"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        for key in ["poet", "poem_title", "poem_snippet", "book_title"] {
            assert!(json["analysis"].get(key).is_some(), "missing analysis.{key}");
        }
    }

    #[test]
    fn test_tolerates_older_entries_on_load() {
        let entry: ArchiveEntry =
            serde_json::from_str(r#"{"date": "2024-11-01", "file": "textos/2024-11-01.txt"}"#)
                .unwrap();
        assert_eq!(entry.month, "");
        assert!(entry.keywords.is_empty());
    }

    #[test]
    fn test_missing_quality_fields() {
        let mut meta = meta_with_date("2025-03-10");
        assert_eq!(
            missing_quality_fields(&meta),
            vec!["my_poem_title", "poet", "poem_title"]
        );
        meta.poet = Some("Idea Vilariño".to_string());
        assert_eq!(missing_quality_fields(&meta), vec!["my_poem_title", "poem_title"]);
        meta.my_poem_title = Some("Cartas".to_string());
        meta.poem_title = Some("Ya no".to_string());
        assert!(missing_quality_fields(&meta).is_empty());
    }
}
