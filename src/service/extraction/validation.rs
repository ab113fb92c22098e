//! Validation of LLM-proposed suggestions against the field registry
//!
//! Every candidate is checked independently:
//! 1. Structure: string `field_path`, known `action`, present `suggested_value`
//! 2. Path legality: exact match against the registry
//! 3. Shape agreement with the registry type (skipped for `remove`)

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::field_schema::{expected_type, is_valid_field_path};
use crate::model::{FieldKind, Suggestion, SuggestionAction};

/// Confidence assumed when the model omits it
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Why a single candidate was dropped
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SuggestionRejection {
    #[error("Invalid suggestion structure")]
    InvalidStructure,

    #[error("Unknown field path: {0}")]
    UnknownFieldPath(String),

    #[error("Type mismatch for {path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Result of filtering a candidate batch
#[derive(Debug, Default)]
pub struct FilterOutcome {
    /// Valid suggestions, in input order
    pub accepted: Vec<Suggestion>,
    /// Input index and reason of every dropped candidate
    pub rejected: Vec<(usize, SuggestionRejection)>,
}

/// Runtime shape of a value; anything but array/object is a scalar
fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        _ => "string",
    }
}

fn check_shape(
    path: &str,
    action: SuggestionAction,
    value: &Value,
) -> Result<(), SuggestionRejection> {
    let expected = expected_type(path);
    let actual = shape_of(value);

    let ok = match expected {
        FieldKind::Unknown => true,
        // Array fields take single elements through "add"
        FieldKind::Array if action == SuggestionAction::Add => !value.is_null(),
        FieldKind::Array => value.is_array(),
        FieldKind::Object => value.is_object(),
        FieldKind::String => actual == "string",
    };

    if ok {
        Ok(())
    } else {
        Err(SuggestionRejection::TypeMismatch {
            path: path.to_string(),
            expected: expected.as_str(),
            actual: if value.is_null() { "null" } else { actual },
        })
    }
}

fn read_confidence(obj: &Map<String, Value>, path: &str) -> f64 {
    let Some(raw) = obj.get("confidence").and_then(Value::as_f64) else {
        return DEFAULT_CONFIDENCE;
    };

    let clamped = raw.clamp(0.0, 1.0);
    if clamped != raw {
        tracing::warn!(
            field_path = %path,
            confidence = raw,
            "Confidence outside [0, 1], clamping"
        );
    }
    clamped
}

/// Validate one candidate and convert it into a typed suggestion
pub fn validate(candidate: &Value) -> Result<Suggestion, SuggestionRejection> {
    let obj = candidate
        .as_object()
        .ok_or(SuggestionRejection::InvalidStructure)?;

    let field_path = obj
        .get("field_path")
        .and_then(Value::as_str)
        .ok_or(SuggestionRejection::InvalidStructure)?;
    let action = obj
        .get("action")
        .and_then(Value::as_str)
        .and_then(SuggestionAction::parse)
        .ok_or(SuggestionRejection::InvalidStructure)?;
    // Present but possibly null
    let suggested_value = obj
        .get("suggested_value")
        .ok_or(SuggestionRejection::InvalidStructure)?;

    if !is_valid_field_path(field_path) {
        return Err(SuggestionRejection::UnknownFieldPath(field_path.to_string()));
    }

    if action != SuggestionAction::Remove {
        check_shape(field_path, action, suggested_value)?;
    }

    Ok(Suggestion {
        field_path: field_path.to_string(),
        action,
        suggested_value: suggested_value.clone(),
        confidence: read_confidence(obj, field_path),
        reasoning: obj
            .get("reasoning")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Validate every candidate, keeping the valid ones in order
///
/// Invalid candidates are dropped and logged; they never fail the batch.
pub fn filter_valid(candidates: Vec<Value>) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for (index, candidate) in candidates.iter().enumerate() {
        match validate(candidate) {
            Ok(suggestion) => outcome.accepted.push(suggestion),
            Err(reason) => {
                let field_path = candidate
                    .get("field_path")
                    .and_then(Value::as_str)
                    .unwrap_or("<missing>");
                tracing::warn!(
                    index = index,
                    field_path = %field_path,
                    reason = %reason,
                    "Dropping invalid suggestion"
                );
                outcome.rejected.push((index, reason));
            }
        }
    }

    outcome
}
