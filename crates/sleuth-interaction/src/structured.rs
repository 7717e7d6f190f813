//! Parsing of structured (JSON) model answers.
//!
//! Models asked for JSON still wrap it in Markdown fences or add a sentence
//! around it now and then. The object is dug out, then decoded strictly:
//! a shape mismatch is an upstream failure, never coerced.

use regex::Regex;
use serde::de::DeserializeOwned;
use sleuth_core::error::{Result, SleuthError};
use std::sync::LazyLock;
use tracing::warn;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*\n?(.*?)\n?\s*```").expect("fence pattern is valid")
});

/// Returns the JSON object inside `text`.
///
/// Tries, in order: the whole text, the first fenced code block, and the
/// span from the first `{` to the last `}`.
pub fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed);
    }

    if let Some(block) = FENCED_BLOCK
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
    {
        let inner = block.as_str().trim();
        if !inner.is_empty() {
            return Some(inner);
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (start < end).then(|| &trimmed[start..=end])
}

/// Decodes `text` into `T`, labelling failures with `what`.
pub fn parse_structured<T: DeserializeOwned>(text: &str, what: &str) -> Result<T> {
    let Some(json) = extract_json(text) else {
        warn!(what, "Model answer contained no JSON object");
        return Err(SleuthError::invalid_response(format!(
            "{} response contained no JSON object",
            what
        )));
    };

    serde_json::from_str(json).map_err(|e| {
        warn!(what, error = %e, "Model answer did not match the expected schema");
        SleuthError::invalid_response(format!("{} response did not match schema: {}", what, e))
    })
}
