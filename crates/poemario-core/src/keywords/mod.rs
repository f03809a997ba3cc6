//! Keyword canonicalization and re-tiering
//!
//! Candidates arrive from the external generator as loosely shaped
//! (word, weight) pairs. Canonicalization normalizes the words,
//! coerces and clamps the weights, deduplicates under an explicit
//! policy, ranks by weight, and bounds the list. Re-tiering then
//! reassigns weights purely by rank position:
//! - top band (weight 3): up to 5 entries, at least 3 when available
//! - mid band (weight 2): up to 10 of the remainder, at least 6 when available
//! - everything else: weight 1

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::text::normalize_word;

/// Hard cap on the keyword list for one entry
pub const MAX_KEYWORDS: usize = 30;

/// Weight assigned when a candidate's weight cannot be coerced
const DEFAULT_WEIGHT: i64 = 1;

const TOP_BAND_MIN: usize = 3;
const TOP_BAND_MAX: usize = 5;
const MID_BAND_MIN: usize = 6;
const MID_BAND_MAX: usize = 10;

/// A (word, weight) pair as received from the external generator.
///
/// Both field-name spellings seen in the wild are accepted: `word`/`k`
/// and `weight`/`w`. The weight is left untyped because generators
/// return numbers, numeric strings, or garbage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordCandidate {
    #[serde(default, alias = "k")]
    pub word: String,
    #[serde(default, alias = "w")]
    pub weight: Option<serde_json::Value>,
}

impl KeywordCandidate {
    pub fn new(word: impl Into<String>, weight: i64) -> Self {
        KeywordCandidate {
            word: word.into(),
            weight: Some(serde_json::Value::from(weight)),
        }
    }
}

/// A normalized, tier-weighted keyword as persisted in the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub weight: u8,
}

/// How to resolve two candidates normalizing to the same word.
///
/// The generating pipeline keeps the first occurrence before ranking;
/// merging a flat candidate list from a review file keeps the maximum
/// weight seen. One explicit parameter instead of two near-identical
/// code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupePolicy {
    /// First occurrence wins; later duplicates are dropped entirely
    FirstWins,
    /// Keep the maximum weight seen, at the first occurrence's position
    MaxWeight,
}

/// Clean, deduplicate, rank, and bound a candidate list.
///
/// Candidates whose normalized word is empty are discarded. The
/// surviving list is stably sorted by weight descending (ties keep
/// their relative order) and truncated to [`MAX_KEYWORDS`]. Never
/// fails; the result may be empty.
pub fn canonicalize(candidates: &[KeywordCandidate], policy: DedupePolicy) -> Vec<Keyword> {
    let mut keywords: Vec<Keyword> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        let word = normalize_word(&candidate.word);
        if word.is_empty() {
            continue;
        }
        let weight = clamp_weight(coerce_weight(candidate.weight.as_ref()));
        match seen.get(&word) {
            Some(&at) => {
                if policy == DedupePolicy::MaxWeight {
                    keywords[at].weight = keywords[at].weight.max(weight);
                }
            }
            None => {
                seen.insert(word.clone(), keywords.len());
                keywords.push(Keyword { word, weight });
            }
        }
    }

    keywords.sort_by(|a, b| b.weight.cmp(&a.weight));
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

/// Reassign weights purely by rank position over an already-ranked list.
///
/// Overrides whatever weights the generator or the clamp step produced.
pub fn retier(keywords: &[Keyword]) -> Vec<Keyword> {
    let n = keywords.len();
    let top = if n >= TOP_BAND_MIN {
        n.min(TOP_BAND_MAX).max(TOP_BAND_MIN)
    } else {
        n
    };
    let remaining = n - top;
    let mid = if remaining >= MID_BAND_MIN {
        remaining.min(MID_BAND_MAX).max(MID_BAND_MIN)
    } else {
        remaining
    };

    keywords
        .iter()
        .enumerate()
        .map(|(rank, keyword)| {
            let weight = if rank < top {
                3
            } else if rank < top + mid {
                2
            } else {
                1
            };
            Keyword {
                word: keyword.word.clone(),
                weight,
            }
        })
        .collect()
}

/// Coerce an untyped weight to an integer, defaulting on any failure.
/// Numbers truncate toward zero; integral strings parse; anything else
/// falls back to [`DEFAULT_WEIGHT`].
fn coerce_weight(value: Option<&serde_json::Value>) -> i64 {
    match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(DEFAULT_WEIGHT),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().unwrap_or(DEFAULT_WEIGHT),
        Some(serde_json::Value::Bool(b)) => *b as i64,
        _ => DEFAULT_WEIGHT,
    }
}

fn clamp_weight(weight: i64) -> u8 {
    weight.clamp(1, 3) as u8
}
