//! Records: the flat, parent-referencing input the forest is built from.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::{DomainError, DomainResult};

/// Identifier of a record. API payloads use both integer and string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(i) => write!(f, "{}", i),
            RecordId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        RecordId::Int(value.into())
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Str(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Str(value)
    }
}

/// Anything the forest builder can arrange: an id, an optional parent id and
/// a display title.
pub trait Record {
    fn id(&self) -> &RecordId;
    fn parent_id(&self) -> Option<&RecordId>;
    fn title(&self) -> &str;
}

/// Names of the JSON fields holding id, parent reference and title.
///
/// Callers disagree on the parent field (`parent` vs `parentId` vs
/// `parent_location_id`), so none of these are hardcoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FieldNames {
    pub id: String,
    pub parent: String,
    pub title: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            id: "id".into(),
            parent: "parent".into(),
            title: "title".into(),
        }
    }
}

impl FieldNames {
    /// Default field names with a different parent field.
    pub fn with_parent(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            ..Self::default()
        }
    }
}

/// A decoded input record.
///
/// Fields not named by [`FieldNames`] are kept verbatim in `extra` so callers
/// can serialize selections back with their original payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputRecord {
    pub id: RecordId,
    pub parent: Option<RecordId>,
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InputRecord {
    pub fn new(id: impl Into<RecordId>, parent: Option<RecordId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent,
            title: title.into(),
            extra: Map::new(),
        }
    }

    /// Decode one JSON object using the given field names.
    ///
    /// A missing, `null` or empty-string parent means "no parent"; `0` is a
    /// regular id. A missing title decodes as an empty title.
    pub fn from_json(position: usize, value: &Value, fields: &FieldNames) -> DomainResult<Self> {
        let invalid = |message: String| DomainError::InvalidRecord { position, message };

        let object = value
            .as_object()
            .ok_or_else(|| invalid(format!("expected object, got {}", json_kind(value))))?;

        let id = match object.get(&fields.id) {
            None | Some(Value::Null) => {
                return Err(invalid(format!("missing id field '{}'", fields.id)));
            }
            Some(v) => scalar_id(v)
                .ok_or_else(|| invalid(format!("id field '{}' is {}", fields.id, json_kind(v))))?,
        };

        let parent = match object.get(&fields.parent) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(v) => Some(scalar_id(v).ok_or_else(|| {
                invalid(format!("parent field '{}' is {}", fields.parent, json_kind(v)))
            })?),
        };

        let title = match object.get(&fields.title) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
        };

        let extra = object
            .iter()
            .filter(|(k, _)| **k != fields.id && **k != fields.parent && **k != fields.title)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Self {
            id,
            parent,
            title,
            extra,
        })
    }
}

impl Record for InputRecord {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn parent_id(&self) -> Option<&RecordId> {
        self.parent.as_ref()
    }

    fn title(&self) -> &str {
        &self.title
    }
}

fn scalar_id(value: &Value) -> Option<RecordId> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(RecordId::Int(i))
            } else if n.is_u64() {
                Some(RecordId::Str(n.to_string()))
            } else {
                // `1.0` names the same record as `1`; fractions are no id
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| RecordId::Int(f as i64))
            }
        }
        Value::String(s) => Some(RecordId::Str(s.clone())),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.as_f64().is_some_and(|f| f.fract() != 0.0) => "a fractional number",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
