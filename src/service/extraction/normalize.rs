//! Normalization of raw LLM responses into a candidate array
//!
//! Accepted envelopes: a bare array, `{"suggestions": [...]}`, or a single
//! suggestion object. A surrounding markdown code fence is tolerated.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::error::ExtractionError;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)\r?\n?```$").unwrap()
});

/// Strip one surrounding code fence and outer whitespace
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    CODE_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(trimmed)
}

/// Map a parsed response envelope onto the canonical candidate array
pub fn normalize_envelope(value: Value) -> Result<Vec<Value>, ExtractionError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("suggestions") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(ExtractionError::UnparseableResponse(format!(
                "'suggestions' is {} instead of an array",
                shape_name(&other)
            ))),
            None => Ok(vec![Value::Object(map)]),
        },
        other => Err(ExtractionError::UnparseableResponse(format!(
            "expected an array or object, got {}",
            shape_name(&other)
        ))),
    }
}

/// Parse raw completion text into candidate suggestion values
pub fn parse_response(raw: &str) -> Result<Vec<Value>, ExtractionError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(ExtractionError::UnparseableResponse(
            "empty response".to_string(),
        ));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| ExtractionError::UnparseableResponse(e.to_string()))?;
    normalize_envelope(value)
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_three_envelopes() {
        let item = json!({"field_path": "title", "action": "update", "suggested_value": "CTO"});

        let bare = parse_response(&json!([item.clone()]).to_string()).unwrap();
        let wrapped = parse_response(&json!({"suggestions": [item.clone()]}).to_string()).unwrap();
        let single = parse_response(&item.to_string()).unwrap();

        assert_eq!(bare, vec![item.clone()]);
        assert_eq!(wrapped, vec![item.clone()]);
        assert_eq!(single, vec![item]);
    }

    #[test]
    fn test_empty_array_is_not_an_error() {
        assert!(parse_response("[]").unwrap().is_empty());
        assert!(parse_response(r#"{"suggestions": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let raw = "```json\n[{\"field_path\": \"email\"}]\n```\n";
        assert_eq!(strip_code_fence(raw), "[{\"field_path\": \"email\"}]");
        assert_eq!(parse_response(raw).unwrap().len(), 1);

        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("  [] "), "[]");
    }

    #[test]
    fn test_unparseable_responses() {
        for raw in ["", "   ", "I could not find anything.", "42", "\"text\"", r#"{"suggestions": "none"}"#] {
            assert!(
                matches!(parse_response(raw), Err(ExtractionError::UnparseableResponse(_))),
                "expected failure for {raw:?}"
            );
        }
    }
}
