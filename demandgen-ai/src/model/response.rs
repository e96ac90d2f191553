//! Defensive parsing of model output
//!
//! Models often wrap JSON in markdown code fences or add a sentence before
//! it. Parsing strips fences first, then falls back to the outermost `{...}`
//! span before giving up.

use serde_json::{Map, Value};

use super::ModelError;

/// Remove a surrounding markdown code fence (```json ... ``` or ``` ... ```)
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };

    // Skip the fence marker and its info string ("json", "JSON", ...)
    let after_marker = &trimmed[start + 3..];
    let body_start = after_marker.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_marker[body_start..];

    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Parse model output into a JSON object
pub fn parse_json_object(text: &str) -> Result<Map<String, Value>, ModelError> {
    let cleaned = strip_code_fences(text);

    let value = match serde_json::from_str::<Value>(cleaned) {
        Ok(value) => value,
        Err(first_err) => {
            let span = cleaned
                .find('{')
                .zip(cleaned.rfind('}'))
                .filter(|(start, end)| start < end)
                .map(|(start, end)| &cleaned[start..=end]);

            match span {
                Some(span) => serde_json::from_str::<Value>(span)
                    .map_err(|_| ModelError::Parse(first_err.to_string()))?,
                None => return Err(ModelError::Parse(first_err.to_string())),
            }
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ModelError::Parse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
