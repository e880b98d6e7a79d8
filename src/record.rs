//! Core data model for the audit-history pipeline.
//!
//! Historical records arrive from the REST backend as free-form JSON objects
//! whose schema may vary between snapshots in the same list. Nothing here is
//! mutated after retrieval; the pipeline is a pure projection over these
//! types.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Nested free-form extension fields carried by some records.
pub const ATTRIBUTES_FIELD: &str = "attributes";

/// Primary key field, excluded from display.
pub const ID_FIELD: &str = "id";

/// One historical snapshot of a domain entity.
///
/// The record is an opaque string-keyed mapping. It may carry a nested
/// `attributes` object and zero or more reference fields named by the
/// `<type>Id` / `<type>Ids` convention.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRecord {
    fields: Map<String, Value>,
}

impl HistoricalRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wraps a JSON value, returning `None` for anything but an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field keys in the order the backend serialized them.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    /// The nested `attributes` object, if the record carries one.
    pub fn attributes(&self) -> Option<&Map<String, Value>> {
        self.fields.get(ATTRIBUTES_FIELD).and_then(Value::as_object)
    }

    /// Identifier held by a singular reference field.
    ///
    /// Absent, null, and non-identifier values all yield `None`.
    pub fn reference_id(&self, field: &str) -> Option<ReferenceId> {
        self.fields.get(field).and_then(ReferenceId::from_value)
    }

    /// Identifiers held by a plural reference field, in array order.
    ///
    /// An absent field or a non-array value yields an empty list.
    pub fn reference_ids(&self, field: &str) -> Vec<ReferenceId> {
        match self.fields.get(field).and_then(Value::as_array) {
            Some(items) => items.iter().filter_map(ReferenceId::from_value).collect(),
            None => Vec::new(),
        }
    }
}

/// Opaque foreign-key identifier carried by a reference field.
///
/// The backend serializes identifiers as JSON numbers or strings; both are
/// canonicalized to their textual form. Identifiers are never validated
/// before lookup — existence is decided solely by the lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferenceId(String);

impl ReferenceId {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(n.to_string())),
            Value::String(s) => Some(Self(s.clone())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReferenceId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<i64> for ReferenceId {
    fn from(raw: i64) -> Self {
        Self(raw.to_string())
    }
}

/// One table column: the raw record key and its derived display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub key: String,
    pub label: String,
}

/// Fully resolved table handed to the presentation layer.
///
/// Headers and row cells share one column order: fixed fields first, then
/// dynamic attribute columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderModel {
    pub headers: Vec<Header>,
    pub rows: Vec<Vec<String>>,
}

impl RenderModel {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Caller-facing outcome of a successful pipeline run.
///
/// An empty record list is a distinct non-error state; retrieval failures
/// surface separately as [`crate::error::RetrievalError`].
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    /// The endpoint returned zero records.
    NoData,
    /// A fully resolved table.
    Table(RenderModel),
}
