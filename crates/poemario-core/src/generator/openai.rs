//! OpenAI-compatible chat-completions client
//!
//! One synchronous request per invocation; failures propagate as
//! generation errors and are never retried here.

use std::time::Duration;

use serde_json::Value;

use super::{analysis_prompt, parse_candidates, KeywordGenerator, DOCUMENT_SYSTEM_PROMPT};
use crate::document::Metadata;
use crate::error::{PoemarioError, Result};
use crate::keywords::KeywordCandidate;

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Model used when neither flag, environment, nor config names one
pub const DEFAULT_MODEL: &str = "gpt-5";

/// Base URL override, for OpenAI-compatible endpoints
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const REQUEST_TIMEOUT_SECONDS: u64 = 120;

/// Synchronous client for an OpenAI-compatible chat-completions endpoint
pub struct OpenAiGenerator {
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiGenerator {
    /// Build a client from the environment. Fails when the API key is
    /// absent or empty.
    pub fn from_env(model: &str) -> Result<OpenAiGenerator> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| PoemarioError::Generation {
                reason: format!("{} is not set", API_KEY_ENV),
            })?;
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(OpenAiGenerator {
            api_key,
            model: model.to_string(),
            base_url,
        })
    }

    /// Candidate keywords for a whole document, under the standing
    /// system instruction (review-file workflow)
    pub fn generate_from_document(&self, document_text: &str) -> Result<Vec<KeywordCandidate>> {
        let raw = self.complete(Some(DOCUMENT_SYSTEM_PROMPT), document_text)?;
        parse_candidates(&raw)
    }

    fn complete(&self, system: Option<&str>, prompt: &str) -> Result<String> {
        let mut messages = Vec::new();
        if let Some(system) = system {
            messages.push(serde_json::json!({"role": "system", "content": system}));
        }
        messages.push(serde_json::json!({"role": "user", "content": prompt}));

        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "response_format": {"type": "json_object"},
        });

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        tracing::debug!(model = %self.model, "request_keywords");

        let response = ureq::post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .send_string(&body.to_string());

        let text = match response {
            Ok(res) => res.into_string().map_err(|e| PoemarioError::Generation {
                reason: format!("failed to read API response: {}", e),
            })?,
            Err(ureq::Error::Status(code, _)) => {
                return Err(PoemarioError::Generation {
                    reason: format!("API returned HTTP {}", code),
                })
            }
            Err(ureq::Error::Transport(e)) => {
                return Err(PoemarioError::Generation {
                    reason: format!("transport error: {}", e),
                })
            }
        };

        let parsed: Value =
            serde_json::from_str(&text).map_err(|e| PoemarioError::Generation {
                reason: format!("unparsable API response: {}", e),
            })?;

        parsed["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| PoemarioError::Generation {
                reason: "API response contained no content".to_string(),
            })
    }
}

impl KeywordGenerator for OpenAiGenerator {
    fn generate(&self, analysis_text: &str, meta: &Metadata) -> Result<Vec<KeywordCandidate>> {
        let prompt = analysis_prompt(analysis_text, meta);
        let raw = self.complete(None, &prompt)?;
        parse_candidates(&raw)
    }
}
