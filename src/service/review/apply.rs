//! Translation of approved suggestions into a contact patch
//!
//! - `update` replaces the value at the path (null clears it)
//! - `add` appends to arrays without duplicates, shallow-merges objects,
//!   sets anything else
//! - `remove` with null deletes the field; otherwise removes matching array
//!   elements, or deletes a non-array field whose value matches

use serde_json::Value;
use uuid::Uuid;

use crate::model::field_schema::{FieldLocation, expected_type, locate};
use crate::model::{
    ContactPatch, ContactRecord, ContactWriteError, FieldKind, FieldWrite, Suggestion,
    SuggestionAction,
};

/// Element equality used for de-duplication and removal
///
/// Strings compare trimmed and case-insensitively.
pub fn values_match(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.trim().to_lowercase() == y.trim().to_lowercase(),
        _ => a == b,
    }
}

/// Elements carried by a value: the array items, or the value itself
fn elements(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

fn non_null(value: Value) -> Option<Value> {
    if value.is_null() { None } else { Some(value) }
}

/// Contact columns hold text; numbers and booleans are stored as their text form
fn coerce_for_path(path: &str, value: &Value) -> Value {
    match (locate(path), value) {
        (Some(FieldLocation::Direct(_)), Value::Number(n)) => Value::String(n.to_string()),
        (Some(FieldLocation::Direct(_)), Value::Bool(b)) => Value::String(b.to_string()),
        _ => value.clone(),
    }
}

fn apply_add(current: Option<Value>, value: Value, kind: FieldKind) -> Option<Value> {
    let current = current.and_then(non_null);

    match current {
        Some(Value::Array(mut items)) => {
            append_unique(&mut items, &value);
            Some(Value::Array(items))
        }
        Some(Value::Object(mut map)) if value.is_object() => {
            if let Value::Object(incoming) = value {
                map.extend(incoming);
            }
            Some(Value::Object(map))
        }
        // Legacy scalar stored in an array field
        Some(other) if kind == FieldKind::Array => {
            let mut items = vec![other];
            append_unique(&mut items, &value);
            Some(Value::Array(items))
        }
        None if kind == FieldKind::Array => {
            let mut items = Vec::new();
            append_unique(&mut items, &value);
            Some(Value::Array(items))
        }
        _ => non_null(value),
    }
}

fn append_unique(items: &mut Vec<Value>, value: &Value) {
    for element in elements(value) {
        if !element.is_null() && !items.iter().any(|e| values_match(e, &element)) {
            items.push(element);
        }
    }
}

fn apply_remove(current: Option<Value>, value: &Value) -> Option<Value> {
    if value.is_null() {
        return None;
    }

    match current {
        Some(Value::Array(items)) => {
            let targets = elements(value);
            let kept: Vec<Value> = items
                .into_iter()
                .filter(|item| !targets.iter().any(|t| values_match(item, t)))
                .collect();
            Some(Value::Array(kept))
        }
        Some(other) if values_match(&other, value) => None,
        other => other,
    }
}

/// New value at a path after applying one suggestion to its current value
pub fn apply_action(current: Option<Value>, suggestion: &Suggestion) -> Option<Value> {
    let kind = expected_type(&suggestion.field_path);
    let value = coerce_for_path(&suggestion.field_path, &suggestion.suggested_value);

    match suggestion.action {
        SuggestionAction::Update => non_null(value),
        SuggestionAction::Add => apply_add(current, value, kind),
        SuggestionAction::Remove => apply_remove(current, &value),
    }
}

/// Compute the patch applying `suggestions` in order on top of `contact`
///
/// Suggestions touching the same path compose. Every touched path gets its
/// `field_sources` entry pointed at `artifact_id`.
pub fn plan_patch(
    contact: &ContactRecord,
    suggestions: &[&Suggestion],
    artifact_id: Uuid,
) -> Result<ContactPatch, ContactWriteError> {
    let mut working = contact.clone();
    let mut touched: Vec<&str> = Vec::new();

    for suggestion in suggestions {
        let path = suggestion.field_path.as_str();
        let next = apply_action(working.field_value(path), suggestion);
        working.set_field_value(path, next)?;
        if !touched.contains(&path) {
            touched.push(path);
        }
    }

    let mut patch = ContactPatch::default();
    for path in touched {
        patch.writes.push(FieldWrite {
            path: path.to_string(),
            value: working.field_value(path),
        });
        patch.field_sources.insert(path.to_string(), artifact_id);
    }

    Ok(patch)
}
