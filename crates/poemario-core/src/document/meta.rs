//! Canonical metadata keys and the bilingual alias table

/// Canonical metadata keys recognized in a document's metadata block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    Date,
    Poet,
    PoemTitle,
    PoemSnippet,
    BookTitle,
    MyPoemTitle,
    MyPoemSnippet,
}

/// Surface spellings (Spanish and English) mapped to canonical keys.
/// Plain lookup table; surface keys are matched after upper-casing.
const META_ALIASES: &[(&str, MetaKey)] = &[
    ("FECHA", MetaKey::Date),
    ("DATE", MetaKey::Date),
    ("POETA", MetaKey::Poet),
    ("POET", MetaKey::Poet),
    ("POEM_TITLE", MetaKey::PoemTitle),
    ("TITULO_POEMA", MetaKey::PoemTitle),
    ("POEM_SNIPPET", MetaKey::PoemSnippet),
    ("FRAGMENTO_POEMA", MetaKey::PoemSnippet),
    ("BOOK_TITLE", MetaKey::BookTitle),
    ("TITULO_LIBRO", MetaKey::BookTitle),
    ("MY_POEM_TITLE", MetaKey::MyPoemTitle),
    ("MI_TITULO", MetaKey::MyPoemTitle),
    ("MY_POEM_SNIPPET", MetaKey::MyPoemSnippet),
    ("MI_FRAGMENTO", MetaKey::MyPoemSnippet),
];

impl MetaKey {
    /// Resolve a surface key as written in a document, case-insensitively.
    /// Returns `None` for keys outside the alias table.
    pub fn from_surface(key: &str) -> Option<MetaKey> {
        let upper = key.trim().to_uppercase();
        META_ALIASES
            .iter()
            .find(|(alias, _)| *alias == upper)
            .map(|(_, canonical)| *canonical)
    }
}

/// Structured fields extracted from a document's metadata block.
///
/// A `None` field was absent from the source (and survived every
/// fallback rule); it becomes an empty string when the archive entry
/// is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub date: Option<String>,
    pub poet: Option<String>,
    pub poem_title: Option<String>,
    pub poem_snippet: Option<String>,
    pub book_title: Option<String>,
    pub my_poem_title: Option<String>,
    pub my_poem_snippet: Option<String>,
}

impl Metadata {
    /// Set a canonical field. Used both by the parser (where a repeated
    /// key means the last line wins) and for explicit CLI overrides.
    pub fn set(&mut self, key: MetaKey, value: String) {
        let slot = match key {
            MetaKey::Date => &mut self.date,
            MetaKey::Poet => &mut self.poet,
            MetaKey::PoemTitle => &mut self.poem_title,
            MetaKey::PoemSnippet => &mut self.poem_snippet,
            MetaKey::BookTitle => &mut self.book_title,
            MetaKey::MyPoemTitle => &mut self.my_poem_title,
            MetaKey::MyPoemSnippet => &mut self.my_poem_snippet,
        };
        *slot = Some(value);
    }

    /// Get a canonical field, if set
    pub fn get(&self, key: MetaKey) -> Option<&str> {
        match key {
            MetaKey::Date => self.date.as_deref(),
            MetaKey::Poet => self.poet.as_deref(),
            MetaKey::PoemTitle => self.poem_title.as_deref(),
            MetaKey::PoemSnippet => self.poem_snippet.as_deref(),
            MetaKey::BookTitle => self.book_title.as_deref(),
            MetaKey::MyPoemTitle => self.my_poem_title.as_deref(),
            MetaKey::MyPoemSnippet => self.my_poem_snippet.as_deref(),
        }
    }
}
