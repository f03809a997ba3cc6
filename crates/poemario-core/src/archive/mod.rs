//! The persisted archive: an ordered collection of entries
//!
//! The archive is a single JSON file holding one array of entries,
//! sorted by date descending. It is loaded fully into memory, grows by
//! one entry per invocation, and is rewritten whole on save (temp file
//! + rename). Callers must serialize invocations; there is no lock.

pub mod entry;

use std::fs;
use std::path::Path;

use crate::error::{PoemarioError, Result};
pub use entry::{missing_quality_fields, Analysis, ArchiveEntry};

/// In-memory view of the persisted archive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Load an archive from disk.
    ///
    /// A missing file yields an empty archive. A file whose root is not
    /// a JSON array is rejected; individual entries tolerate missing
    /// fields.
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Archive> {
        if !path.exists() {
            return Ok(Archive::default());
        }
        let content = fs::read_to_string(path)?;
        let root: serde_json::Value = serde_json::from_str(&content)?;
        if !root.is_array() {
            return Err(PoemarioError::InvalidArchive {
                path: path.to_path_buf(),
                reason: "root is not a JSON array".to_string(),
            });
        }
        let entries: Vec<ArchiveEntry> = serde_json::from_value(root)?;
        tracing::debug!(entries = entries.len(), "load_archive");
        Ok(Archive { entries })
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_date(&self, date: &str) -> bool {
        self.entries.iter().any(|e| e.date == date)
    }

    /// Insert a new entry, enforcing date uniqueness.
    ///
    /// On a duplicate date the archive is left untouched. On success
    /// the collection is re-sorted by date descending (lexicographic
    /// order is correct for ISO dates).
    pub fn merge(&mut self, entry: ArchiveEntry) -> Result<()> {
        if self.contains_date(&entry.date) {
            return Err(PoemarioError::DuplicateDate { date: entry.date });
        }
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(())
    }

    /// Rewrite the whole archive file atomically.
    ///
    /// Pretty-printed JSON with a trailing newline; non-ASCII text is
    /// written as-is. The parent directory is created when needed.
    #[tracing::instrument(skip(self, path), fields(path = %path.display(), entries = self.entries.len()))]
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut content = serde_json::to_string_pretty(&self.entries)?;
        content.push('\n');

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(date: &str) -> ArchiveEntry {
        ArchiveEntry {
            date: date.to_string(),
            month: date[..7].to_string(),
            ..ArchiveEntry::default()
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let archive = Archive::load(&dir.path().join("archivo.json")).unwrap();
        assert!(archive.is_empty());
    }

    #[test]
    fn test_load_rejects_non_array_root() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("archivo.json");
        fs::write(&path, r#"{"entries": []}"#).unwrap();
        let err = Archive::load(&path).unwrap_err();
        assert!(matches!(err, PoemarioError::InvalidArchive { .. }));
    }

    #[test]
    fn test_merge_sorts_descending() {
        let mut archive = Archive::default();
        archive.merge(entry("2025-02-01")).unwrap();
        archive.merge(entry("2025-01-01")).unwrap();
        archive.merge(entry("2025-03-01")).unwrap();
        let dates: Vec<&str> = archive.entries().iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-03-01", "2025-02-01", "2025-01-01"]);
    }

    #[test]
    fn test_merge_duplicate_date_leaves_archive_unmodified() {
        let mut archive = Archive::default();
        archive.merge(entry("2025-01-01")).unwrap();
        let before = archive.clone();
        let err = archive.merge(entry("2025-01-01")).unwrap_err();
        assert!(matches!(err, PoemarioError::DuplicateDate { .. }));
        assert_eq!(archive, before);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("archivo.json");

        let mut archive = Archive::default();
        archive.merge(entry("2025-01-01")).unwrap();
        archive.merge(entry("2025-02-01")).unwrap();
        archive.save(&path).unwrap();

        let loaded = Archive::load(&path).unwrap();
        assert_eq!(loaded, archive);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with('\n'));
        assert!(text.trim_start().starts_with('['));
    }

    #[test]
    fn test_save_preserves_non_ascii() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("archivo.json");

        let mut archive = Archive::default();
        let mut e = entry("2025-01-01");
        e.my_poem_title = "Canción del árbol".to_string();
        archive.merge(e).unwrap();
        archive.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Canción del árbol"));
    }
}
