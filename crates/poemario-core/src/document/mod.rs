//! Tolerant parser for poem log documents
//!
//! A document is UTF-8 text with an optional metadata block of
//! `KEY: value` lines, followed by sections headed by `# LABEL` lines.
//! Parsing never fails on malformed input: unrecognized lines are
//! ignored and absent fields simply stay unset, to be caught by
//! validation when the archive entry is built.

pub mod meta;

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{PoemarioError, Result};
pub use meta::{MetaKey, Metadata};

/// Section labels recognized in a document body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// The author's own composition (`POEMA`)
    Poem,
    /// The cited reference poem (`POEMA_CITADO`)
    CitedPoem,
    /// Free-form commentary (`TEXTO`), used as the analysis text
    Analysis,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Poem, Section::CitedPoem, Section::Analysis];

    /// The header label as written in documents
    pub fn label(&self) -> &'static str {
        match self {
            Section::Poem => "POEMA",
            Section::CitedPoem => "POEMA_CITADO",
            Section::Analysis => "TEXTO",
        }
    }

    fn from_label(label: &str) -> Option<Section> {
        Section::ALL.iter().copied().find(|s| s.label() == label)
    }
}

/// Text found under each recognized section header.
///
/// A `None` section was absent from the document. A repeated header
/// label keeps only the later occurrence's content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    pub poem: Option<String>,
    pub cited_poem: Option<String>,
    pub analysis: Option<String>,
}

impl Sections {
    fn set(&mut self, section: Section, content: String) {
        match section {
            Section::Poem => self.poem = Some(content),
            Section::CitedPoem => self.cited_poem = Some(content),
            Section::Analysis => self.analysis = Some(content),
        }
    }

    /// Get a section's trimmed content, if present
    pub fn get(&self, section: Section) -> Option<&str> {
        match section {
            Section::Poem => self.poem.as_deref(),
            Section::CitedPoem => self.cited_poem.as_deref(),
            Section::Analysis => self.analysis.as_deref(),
        }
    }
}

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*#\s*(POEMA_CITADO|POEMA|TEXTO)\s*$").expect("hardcoded regex")
    })
}

fn meta_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-zÁÉÍÓÚÑ_]+)\s*:\s*(.*?)\s*$").expect("hardcoded regex")
    })
}

fn filename_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("hardcoded regex"))
}

/// Parse a raw document into metadata and sections.
///
/// The filename is only consulted as a fallback source for the date.
pub fn parse(raw_text: &str, filename: &str) -> (Metadata, Sections) {
    let raw = raw_text.strip_prefix('\u{feff}').unwrap_or(raw_text);
    let raw = raw.replace("\r\n", "\n");

    let headers: Vec<(usize, usize, Section)> = header_re()
        .captures_iter(&raw)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let section = Section::from_label(caps.get(1)?.as_str())?;
            Some((whole.start(), whole.end(), section))
        })
        .collect();

    // Everything before the first recognized header is the metadata block
    let meta_end = headers.first().map_or(raw.len(), |(start, _, _)| *start);
    let mut metadata = Metadata::default();
    for line in raw[..meta_end].lines() {
        let Some(caps) = meta_line_re().captures(line) else {
            continue;
        };
        let value = caps.get(2).map_or("", |m| m.as_str());
        if value.is_empty() {
            continue;
        }
        if let Some(key) = MetaKey::from_surface(&caps[1]) {
            // repeated canonical keys within the block: last line wins
            metadata.set(key, value.to_string());
        }
    }

    let mut sections = Sections::default();
    for (i, (_, end, section)) in headers.iter().enumerate() {
        let next = headers.get(i + 1).map_or(raw.len(), |(start, _, _)| *start);
        sections.set(*section, raw[*end..next].trim().to_string());
    }

    apply_fallbacks(&mut metadata, &sections, filename);

    tracing::debug!(
        headers = headers.len(),
        has_date = metadata.date.is_some(),
        "parse_document"
    );

    (metadata, sections)
}

/// Read and parse a document file.
///
/// The file's own name feeds the date fallback; the caller decides how
/// to reference the file in the archive.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn parse_file(path: &Path) -> Result<(Metadata, Sections)> {
    if !path.is_file() {
        return Err(PoemarioError::DocumentNotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(path)?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(parse(&raw, &filename))
}

/// Fallback rules, applied only when the corresponding key is still absent
fn apply_fallbacks(metadata: &mut Metadata, sections: &Sections, filename: &str) {
    if metadata.date.is_none() {
        if let Some(found) = filename_date_re().find(filename) {
            metadata.date = Some(found.as_str().to_string());
        }
    }
    if metadata.my_poem_snippet.is_none() {
        if let Some(line) = sections.get(Section::Poem).and_then(first_nonblank_line) {
            metadata.my_poem_snippet = Some(line.to_string());
        }
    }
    if metadata.poem_snippet.is_none() {
        if let Some(line) = sections.get(Section::CitedPoem).and_then(first_nonblank_line) {
            metadata.poem_snippet = Some(line.to_string());
        }
    }
}

fn first_nonblank_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "FECHA: 2025-12-24\n\
POETA: Alejandra Pizarnik\n\
POEM_TITLE: El despertar\n\
MI_TITULO: Vigilia\n\
\n\
# POEMA\n\
la noche cerrada\n\
sobre la casa vacia\n\
\n\
# POEMA_CITADO\n\
Señor\n\
La jaula se ha vuelto pájaro\n\
\n\
# TEXTO\n\
El poema dialoga con la imagen de la jaula.\n";

    #[test]
    fn test_parse_metadata_block() {
        let (meta, _) = parse(SAMPLE, "2025-12-24.txt");
        assert_eq!(meta.date.as_deref(), Some("2025-12-24"));
        assert_eq!(meta.poet.as_deref(), Some("Alejandra Pizarnik"));
        assert_eq!(meta.poem_title.as_deref(), Some("El despertar"));
        assert_eq!(meta.my_poem_title.as_deref(), Some("Vigilia"));
    }

    #[test]
    fn test_parse_sections() {
        let (_, sections) = parse(SAMPLE, "2025-12-24.txt");
        assert_eq!(
            sections.get(Section::Poem),
            Some("la noche cerrada\nsobre la casa vacia")
        );
        assert_eq!(
            sections.get(Section::Analysis),
            Some("El poema dialoga con la imagen de la jaula.")
        );
    }

    #[test]
    fn test_snippet_fallbacks_use_first_nonblank_line() {
        let (meta, _) = parse(SAMPLE, "2025-12-24.txt");
        assert_eq!(meta.my_poem_snippet.as_deref(), Some("la noche cerrada"));
        assert_eq!(meta.poem_snippet.as_deref(), Some("Señor"));
    }

    #[test]
    fn test_explicit_snippet_beats_fallback() {
        let text = format!("MI_FRAGMENTO: otra linea\n\n{}", SAMPLE);
        let (meta, _) = parse(&text, "2025-12-24.txt");
        assert_eq!(meta.my_poem_snippet.as_deref(), Some("otra linea"));
    }

    #[test]
    fn test_date_from_filename() {
        let text = "# TEXTO\nalgo\n";
        let (meta, _) = parse(text, "textos-2025-03-10-final.txt");
        assert_eq!(meta.date.as_deref(), Some("2025-03-10"));
    }

    #[test]
    fn test_date_absent_stays_unset() {
        let (meta, _) = parse("# TEXTO\nalgo\n", "borrador.txt");
        assert_eq!(meta.date, None);
    }

    #[test]
    fn test_bom_and_crlf() {
        let text = "\u{feff}FECHA: 2025-01-02\r\n# TEXTO\r\nhola\r\n";
        let (meta, sections) = parse(text, "nota.txt");
        assert_eq!(meta.date.as_deref(), Some("2025-01-02"));
        assert_eq!(sections.get(Section::Analysis), Some("hola"));
    }

    #[test]
    fn test_duplicate_meta_key_last_wins() {
        let text = "FECHA: 2025-01-01\nFECHA: 2025-02-02\n# TEXTO\nx\n";
        let (meta, _) = parse(text, "nota.txt");
        assert_eq!(meta.date.as_deref(), Some("2025-02-02"));
    }

    #[test]
    fn test_duplicate_section_header_later_wins() {
        let text = "# TEXTO\nprimero\n# TEXTO\nsegundo\n";
        let (_, sections) = parse(text, "nota.txt");
        assert_eq!(sections.get(Section::Analysis), Some("segundo"));
    }

    #[test]
    fn test_junk_and_empty_values_ignored() {
        let text = "esto no es un campo\nPOETA:\nNOTA_LIBRE: algo\n# TEXTO\nx\n";
        let (meta, _) = parse(text, "nota.txt");
        assert_eq!(meta.poet, None);
        assert_eq!(meta, Metadata::default());
    }

    #[test]
    fn test_header_with_surrounding_whitespace() {
        let text = "   #  TEXTO   \ncontenido\n";
        let (_, sections) = parse(text, "nota.txt");
        assert_eq!(sections.get(Section::Analysis), Some("contenido"));
    }

    #[test]
    fn test_metadata_only_document() {
        let (meta, sections) = parse("FECHA: 2025-05-05\n", "nota.txt");
        assert_eq!(meta.date.as_deref(), Some("2025-05-05"));
        assert_eq!(sections, Sections::default());
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file(Path::new("/no/such/file.txt")).unwrap_err();
        assert!(matches!(
            err,
            crate::error::PoemarioError::DocumentNotFound { .. }
        ));
    }
}
