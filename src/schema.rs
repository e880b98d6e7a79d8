//! Schema discovery over historical record lists.
//!
//! Audit snapshots carry no server-defined contract; the column plan is
//! derived from the records themselves on every run.

use crate::record::{HistoricalRecord, ATTRIBUTES_FIELD, ID_FIELD};

/// Column plan derived from a record list.
///
/// Fixed columns come from the first record only, minus `id` and
/// `attributes`, in the first record's key order. A later record exposing
/// extra fixed fields does not widen the table; those fields are silently
/// dropped. Attribute columns are the union of `attributes` keys across all
/// records in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    pub fixed_fields: Vec<String>,
    pub attribute_keys: Vec<String>,
}

impl TableSchema {
    pub fn is_empty(&self) -> bool {
        self.fixed_fields.is_empty() && self.attribute_keys.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.fixed_fields.len() + self.attribute_keys.len()
    }
}

/// Derive the column plan for a record list.
///
/// An empty list yields an empty schema; the caller renders a "no data"
/// state rather than an error.
pub fn analyze(records: &[HistoricalRecord]) -> TableSchema {
    let Some(first) = records.first() else {
        return TableSchema::default();
    };

    let fixed_fields = first
        .keys()
        .filter(|key| key.as_str() != ID_FIELD && key.as_str() != ATTRIBUTES_FIELD)
        .cloned()
        .collect();

    let mut attribute_keys: Vec<String> = Vec::new();
    for record in records {
        if let Some(attrs) = record.attributes() {
            for key in attrs.keys() {
                if !attribute_keys.iter().any(|seen| seen == key) {
                    attribute_keys.push(key.clone());
                }
            }
        }
    }

    TableSchema {
        fixed_fields,
        attribute_keys,
    }
}
