//! Keyword generation collaborator
//!
//! The core never retries or reinterprets a generation failure; it
//! accepts whatever candidate list the collaborator returns. Response
//! payloads come in two accepted shapes — a flat list of candidate
//! objects, or an object carrying a `keywords` list — and are sometimes
//! wrapped in code fences or prose, so parsing extracts the first JSON
//! block when the raw text does not parse as-is.

pub mod openai;

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::document::Metadata;
use crate::error::{PoemarioError, Result};
use crate::keywords::KeywordCandidate;
pub use openai::{OpenAiGenerator, API_KEY_ENV, DEFAULT_MODEL};

/// A source of candidate keywords for one document
pub trait KeywordGenerator {
    /// Produce candidate keywords from the analysis text, with the
    /// known metadata fields as context
    fn generate(&self, analysis_text: &str, meta: &Metadata) -> Result<Vec<KeywordCandidate>>;
}

/// System instruction for whole-document keyword generation
/// (the review-file workflow)
pub const DOCUMENT_SYSTEM_PROMPT: &str = "\
Integra los tres bloques juntos (POEMA, POEMA_CITADO, TEXTO), con esta prioridad semántica:
1) POEMA = núcleo conceptual soberano
2) POEMA_CITADO = resonancia
3) TEXTO (análisis) = lente de lectura, no fuente dominante

REGLAS DE SALIDA:
- Devuelve SOLO JSON.
- Formato permitido (elige uno):
  A) [{\"word\":\"...\", \"weight\":3}, ...]
  B) {\"keywords\":[{\"word\":\"...\", \"weight\":3}, ...]}
- Máximo 30 keywords.
- Minúsculas, sin acentos.
- Pesos: 3 (núcleo), 2 (tensiones), 1 (campo semántico).
- No expliques nada.";

/// Prompt for analysis-section keyword generation, carrying the known
/// metadata fields as context
pub fn analysis_prompt(analysis_text: &str, meta: &Metadata) -> String {
    format!(
        "Genera keywords EN ESPAÑOL a partir del análisis.\n\
         \n\
         Reglas:\n\
         - Ideal: 15-25 keywords por texto. Máximo absoluto: 30.\n\
         - Minúsculas, sin acentos (ej: \"ilusión\" -> \"ilusion\").\n\
         - Conceptos buscables, no citas literales.\n\
         - Evita duplicados y variantes redundantes.\n\
         - Puedes usar frases de 1-3 palabras si hace falta.\n\
         \n\
         Pesos (weight):\n\
         - 3-5 keywords con weight=3: núcleo temático.\n\
         - 6-10 keywords con weight=2: ideas fuertes / motivos recurrentes.\n\
         - El resto con weight=1: campo semántico / atmósfera.\n\
         \n\
         Devuelve SOLO JSON válido con esta forma exacta:\n\
         {{\"keywords\":[{{\"word\":\"...\",\"weight\":3}}]}}\n\
         \n\
         Contexto (si falta algo, déjalo tal cual):\n\
         FECHA: {}\n\
         MI_TITULO: {}\n\
         POETA: {}\n\
         POEMA_CITADO: {}\n\
         \n\
         ANALISIS:\n\
         {}",
        meta.date.as_deref().unwrap_or(""),
        meta.my_poem_title.as_deref().unwrap_or(""),
        meta.poet.as_deref().unwrap_or(""),
        meta.poem_title.as_deref().unwrap_or(""),
        analysis_text
    )
}

fn json_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)(\{.*\}|\[.*\])").expect("hardcoded regex"))
}

/// Parse a generator payload into candidates.
///
/// Accepts a flat list or an object with a `keywords` list; list items
/// that are not candidate objects are skipped. Anything else is an
/// upstream generation error.
pub fn parse_candidates(raw: &str) -> Result<Vec<KeywordCandidate>> {
    let value = parse_json_payload(raw)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("keywords") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(PoemarioError::Generation {
                    reason: "response object has no keywords list".to_string(),
                })
            }
        },
        _ => {
            return Err(PoemarioError::Generation {
                reason: "response is not a keyword list".to_string(),
            })
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<KeywordCandidate>(item).ok())
        .collect())
}

fn parse_json_payload(raw: &str) -> Result<Value> {
    match serde_json::from_str(raw.trim()) {
        Ok(value) => Ok(value),
        Err(err) => {
            // fences or prose around the payload: take the first JSON block
            if let Some(block) = json_block_re().find(raw) {
                if let Ok(value) = serde_json::from_str(block.as_str()) {
                    return Ok(value);
                }
            }
            Err(PoemarioError::Generation {
                reason: format!("unparsable keyword payload: {}", err),
            })
        }
    }
}
