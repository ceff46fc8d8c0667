//! Response normalizer — turns free-text model output into structured values.
//!
//! Fallback chain, applied to the cleaned text until one succeeds:
//! 1. strict JSON parse
//! 2. single quotes replaced with double quotes
//! 3. trailing commas before `}` / `]` removed
//!
//! Each attempt starts from the cleaned text; they do not compound.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::evaluation::models::{StepFailure, StepOutput};

static FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```[a-zA-Z]*").unwrap());
static FENCE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```$").unwrap());
static JSON_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^json\s*").unwrap());
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Strips surrounding whitespace, code-fence markers and a leading `json` label.
pub fn clean_json_response(response: &str) -> String {
    let text = response.trim();
    let text = FENCE_OPEN.replace(text, "");
    let text = FENCE_CLOSE.replace(&text, "");
    let text = JSON_LABEL.replace(text.trim_start(), "");
    text.trim().to_string()
}

/// Best-effort JSON decode of already-cleaned model output.
pub fn try_parse_json(cleaned: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(cleaned) {
        return Some(value);
    }

    if let Ok(value) = serde_json::from_str(&cleaned.replace('\'', "\"")) {
        return Some(value);
    }

    serde_json::from_str(&TRAILING_COMMA.replace_all(cleaned, "$1")).ok()
}

/// Cleans, decodes and coerces `raw` into the record `T` with serde.
/// `label` names the record in diagnostics.
///
/// Only a JSON object is coerced; serde would otherwise fill a struct from an
/// array by position.
pub fn normalize<T: DeserializeOwned>(raw: &str, label: &str) -> StepOutput<T> {
    normalize_with(raw, label, |value| {
        if !value.is_object() {
            return Err(format!("Failed to parse {label}: expected a JSON object"));
        }
        serde_json::from_value(value).map_err(|e| format!("Failed to parse {label}: {e}"))
    })
}

/// Like [`normalize`], with a caller-supplied coercion returning a diagnostic on failure.
pub fn normalize_with<T, F>(raw: &str, label: &str, coerce: F) -> StepOutput<T>
where
    F: FnOnce(Value) -> Result<T, String>,
{
    let cleaned = clean_json_response(raw);
    let value = try_parse_json(&cleaned).ok_or_else(|| {
        StepFailure::new(format!("Failed to parse {label}: Could not decode JSON"), raw)
    })?;
    coerce(value).map_err(|diagnostic| StepFailure::new(diagnostic, raw))
}
