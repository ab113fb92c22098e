//! Contact record and targeted field patches

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::field_schema::{self, FieldLocation};

/// A contact with its two semi-structured context trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContactRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    #[schema(value_type = Object)]
    pub professional_context: Value,
    #[schema(value_type = Object)]
    pub personal_context: Value,
    /// Field path -> artifact that last supplied its value
    pub field_sources: BTreeMap<String, Uuid>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContactWriteError {
    #[error("Unknown field path: {0}")]
    UnknownPath(String),

    #[error("Field {0} only accepts string values")]
    NotAString(String),

    #[error("Cannot write {path}: '{segment}' is not an object")]
    NotAnObject { path: String, segment: String },
}

impl ContactRecord {
    /// Empty contact, used when seeding stores
    pub fn new(id: Uuid, user_id: Uuid) -> Self {
        Self {
            id,
            user_id,
            name: None,
            email: None,
            phone: None,
            company: None,
            title: None,
            location: None,
            linkedin_url: None,
            professional_context: Value::Object(Map::new()),
            personal_context: Value::Object(Map::new()),
            field_sources: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    fn direct_slot(&mut self, column: &str) -> Option<&mut Option<String>> {
        match column {
            "name" => Some(&mut self.name),
            "email" => Some(&mut self.email),
            "phone" => Some(&mut self.phone),
            "company" => Some(&mut self.company),
            "title" => Some(&mut self.title),
            "location" => Some(&mut self.location),
            "linkedin_url" => Some(&mut self.linkedin_url),
            _ => None,
        }
    }

    fn direct_value(&self, column: &str) -> Option<&String> {
        match column {
            "name" => self.name.as_ref(),
            "email" => self.email.as_ref(),
            "phone" => self.phone.as_ref(),
            "company" => self.company.as_ref(),
            "title" => self.title.as_ref(),
            "location" => self.location.as_ref(),
            "linkedin_url" => self.linkedin_url.as_ref(),
            _ => None,
        }
    }

    /// Current value at a registry path, if set
    pub fn field_value(&self, path: &str) -> Option<Value> {
        match field_schema::locate(path)? {
            FieldLocation::Direct(column) => {
                self.direct_value(column).cloned().map(Value::String)
            }
            FieldLocation::Personal(keys) => lookup_nested(&self.personal_context, &keys).cloned(),
            FieldLocation::Professional(keys) => {
                lookup_nested(&self.professional_context, &keys).cloned()
            }
        }
    }

    /// Write (or with `None`, delete) the value at a registry path
    ///
    /// Missing intermediate objects are created.
    pub fn set_field_value(
        &mut self,
        path: &str,
        value: Option<Value>,
    ) -> Result<(), ContactWriteError> {
        let location =
            field_schema::locate(path).ok_or_else(|| ContactWriteError::UnknownPath(path.to_string()))?;

        match location {
            FieldLocation::Direct(column) => {
                let text = match value {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s),
                    Some(_) => return Err(ContactWriteError::NotAString(path.to_string())),
                };
                let slot = self
                    .direct_slot(column)
                    .ok_or_else(|| ContactWriteError::UnknownPath(path.to_string()))?;
                *slot = text;
                Ok(())
            }
            FieldLocation::Personal(keys) => write_nested(&mut self.personal_context, path, &keys, value),
            FieldLocation::Professional(keys) => {
                write_nested(&mut self.professional_context, path, &keys, value)
            }
        }
    }

    /// Field paths whose provenance points at `artifact_id`
    pub fn fields_sourced_from(&self, artifact_id: Uuid) -> Vec<String> {
        self.field_sources
            .iter()
            .filter(|(_, source)| **source == artifact_id)
            .map(|(path, _)| path.clone())
            .collect()
    }
}

fn lookup_nested<'a>(root: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(root, |node, key| node.get(key))
}

fn write_nested(
    root: &mut Value,
    path: &str,
    keys: &[&str],
    value: Option<Value>,
) -> Result<(), ContactWriteError> {
    let Some(value) = value else {
        remove_nested(root, keys);
        return Ok(());
    };

    if root.is_null() {
        *root = Value::Object(Map::new());
    }

    let Some((last, parents)) = keys.split_last() else {
        return Err(ContactWriteError::UnknownPath(path.to_string()));
    };

    let mut node = root;
    for key in parents {
        let map = node
            .as_object_mut()
            .ok_or_else(|| ContactWriteError::NotAnObject {
                path: path.to_string(),
                segment: (*key).to_string(),
            })?;
        let child = map
            .entry((*key).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if child.is_null() {
            *child = Value::Object(Map::new());
        }
        node = child;
    }

    let map = node
        .as_object_mut()
        .ok_or_else(|| ContactWriteError::NotAnObject {
            path: path.to_string(),
            segment: (*last).to_string(),
        })?;

    map.insert((*last).to_string(), value);
    Ok(())
}

/// Delete the value at `keys`, pruning intermediate objects left empty
fn remove_nested(node: &mut Value, keys: &[&str]) {
    let Some(map) = node.as_object_mut() else {
        return;
    };
    match keys {
        [] => {}
        [last] => {
            map.remove(*last);
        }
        [first, rest @ ..] => {
            if let Some(child) = map.get_mut(*first) {
                remove_nested(child, rest);
                if child.as_object().is_some_and(|m| m.is_empty()) {
                    map.remove(*first);
                }
            }
        }
    }
}

/// One targeted write inside a contact patch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldWrite {
    pub path: String,
    /// New value; `None` deletes the field
    pub value: Option<Value>,
}

/// A set of targeted path writes plus provenance updates, applied as one unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPatch {
    pub writes: Vec<FieldWrite>,
    /// Merged into `field_sources`
    pub field_sources: BTreeMap<String, Uuid>,
}

impl ContactPatch {
    /// Apply every write to `contact`, or none of them
    pub fn apply_to(&self, contact: &mut ContactRecord) -> Result<(), ContactWriteError> {
        let mut staged = contact.clone();

        for write in &self.writes {
            staged.set_field_value(&write.path, write.value.clone())?;
        }

        staged.field_sources.extend(
            self.field_sources
                .iter()
                .map(|(path, artifact_id)| (path.clone(), *artifact_id)),
        );

        staged.updated_at = Utc::now();
        *contact = staged;
        Ok(())
    }
}
