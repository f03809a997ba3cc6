//! Text normalization for keywords and metadata values

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a word or short phrase for use as a canonical keyword.
///
/// Trims surrounding whitespace, folds to lowercase, strips diacritical
/// marks while preserving base letters ("ilusión" becomes "ilusion"),
/// and collapses internal whitespace runs to a single space. Total
/// function: empty or whitespace-only input yields an empty string.
pub fn normalize_word(word: &str) -> String {
    let folded = word.trim().to_lowercase();
    let stripped: String = folded.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
