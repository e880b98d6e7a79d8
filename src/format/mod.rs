//! Render-model assembly.
//!
//! The formatter is a pure projection: records, the discovered schema, and
//! the resolved reference maps go in; the ordered `{headers, rows}` table
//! comes out. Nothing is fetched or mutated here.

pub mod label;

use std::collections::HashSet;

use chrono::DateTime;
use serde_json::Value;

use crate::record::{Header, HistoricalRecord, RenderModel};
use crate::reference::resolver::ResolvedReferences;
use crate::reference::ReferenceTypeDescriptor;
use crate::schema::TableSchema;

/// Display format for configured timestamp fields.
const TIMESTAMP_DISPLAY: &str = "%Y-%m-%d %H:%M";

/// Field-level formatting rules.
#[derive(Debug, Clone)]
pub struct FormatRules {
    /// Fields rendered as `Yes`/`No` instead of raw booleans.
    pub boolean_fields: HashSet<String>,
    /// RFC 3339 timestamp fields reformatted for display.
    pub timestamp_fields: HashSet<String>,
}

impl Default for FormatRules {
    fn default() -> Self {
        Self {
            boolean_fields: ["warranty", "active", "resolved"]
                .into_iter()
                .map(String::from)
                .collect(),
            timestamp_fields: ["createdAt", "modifiedAt"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Merges resolved references, boolean translation, timestamps, and dynamic
/// attributes into a render-ready table.
pub struct RecordFormatter<'a> {
    descriptors: &'static [ReferenceTypeDescriptor],
    rules: &'a FormatRules,
}

impl<'a> RecordFormatter<'a> {
    pub fn new(descriptors: &'static [ReferenceTypeDescriptor], rules: &'a FormatRules) -> Self {
        Self { descriptors, rules }
    }

    /// Project the records into a table following the schema's column order:
    /// fixed fields first, then attribute columns.
    pub fn render(
        &self,
        records: &[HistoricalRecord],
        schema: &TableSchema,
        resolved: &ResolvedReferences,
    ) -> RenderModel {
        let headers = schema
            .fixed_fields
            .iter()
            .chain(schema.attribute_keys.iter())
            .map(|key| Header {
                key: key.clone(),
                label: label::derive_label(key),
            })
            .collect();

        let rows = records
            .iter()
            .map(|record| self.render_row(record, schema, resolved))
            .collect();

        RenderModel { headers, rows }
    }

    fn render_row(
        &self,
        record: &HistoricalRecord,
        schema: &TableSchema,
        resolved: &ResolvedReferences,
    ) -> Vec<String> {
        let mut cells = Vec::with_capacity(schema.column_count());

        for key in &schema.fixed_fields {
            cells.push(self.render_fixed_cell(record, key, resolved));
        }
        for key in &schema.attribute_keys {
            let cell = record
                .attributes()
                .and_then(|attrs| attrs.get(key))
                .map(render_scalar)
                .unwrap_or_default();
            cells.push(cell);
        }

        cells
    }

    fn render_fixed_cell(
        &self,
        record: &HistoricalRecord,
        key: &str,
        resolved: &ResolvedReferences,
    ) -> String {
        for descriptor in self.descriptors {
            if key == descriptor.singular_field {
                return self.render_singular_reference(record, descriptor, resolved);
            }
            if key == descriptor.plural_field {
                return self.render_plural_reference(record, descriptor, resolved);
            }
        }

        if self.rules.boolean_fields.contains(key) {
            if let Some(flag) = record.get(key).and_then(Value::as_bool) {
                return if flag { "Yes" } else { "No" }.to_string();
            }
        }

        if self.rules.timestamp_fields.contains(key) {
            if let Some(raw) = record.get(key).and_then(Value::as_str) {
                return render_timestamp(raw);
            }
        }

        record.get(key).map(render_scalar).unwrap_or_default()
    }

    /// A singular reference renders its resolved display value; an absent or
    /// null field renders empty.
    fn render_singular_reference(
        &self,
        record: &HistoricalRecord,
        descriptor: &ReferenceTypeDescriptor,
        resolved: &ResolvedReferences,
    ) -> String {
        let Some(id) = record.reference_id(descriptor.singular_field) else {
            return String::new();
        };
        self.display_for(descriptor, resolved, &id)
    }

    /// A plural reference joins its resolved display values with `", "`; an
    /// empty or absent array renders empty.
    fn render_plural_reference(
        &self,
        record: &HistoricalRecord,
        descriptor: &ReferenceTypeDescriptor,
        resolved: &ResolvedReferences,
    ) -> String {
        record
            .reference_ids(descriptor.plural_field)
            .iter()
            .map(|id| self.display_for(descriptor, resolved, id))
            .collect::<Vec<String>>()
            .join(", ")
    }

    fn display_for(
        &self,
        descriptor: &ReferenceTypeDescriptor,
        resolved: &ResolvedReferences,
        id: &crate::record::ReferenceId,
    ) -> String {
        resolved
            .get(descriptor.name)
            .and_then(|map| map.get(id))
            .cloned()
            .unwrap_or_else(|| descriptor.placeholder(id))
    }
}

/// Plain-value rendering: strings unquoted, null empty, nested structures as
/// compact JSON.
fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Reformat an RFC 3339 timestamp for display; unparseable values pass
/// through untouched.
fn render_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed.format(TIMESTAMP_DISPLAY).to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ReferenceId;
    use crate::reference::REFERENCE_TYPES;
    use crate::schema;
    use serde_json::json;

    fn records(values: Vec<Value>) -> Vec<HistoricalRecord> {
        values
            .into_iter()
            .map(|v| HistoricalRecord::from_value(v).expect("fixture must be an object"))
            .collect()
    }

    fn resolved_files(entries: Vec<(i64, &str)>) -> ResolvedReferences {
        let mut map = ResolvedReferences::new();
        map.insert(
            "file",
            entries
                .into_iter()
                .map(|(id, name)| (ReferenceId::from(id), name.to_string()))
                .collect(),
        );
        map
    }

    #[test]
    fn renders_plural_reference_with_partial_miss() {
        let recs = records(vec![json!({"fileIds": [1, 2]})]);
        let table = schema::analyze(&recs);
        let resolved = resolved_files(vec![(1, "a.pdf")]);

        let rules = FormatRules::default();
        let formatter = RecordFormatter::new(REFERENCE_TYPES, &rules);
        let model = formatter.render(&recs, &table, &resolved);

        assert_eq!(model.rows[0][0], "a.pdf, Deleted (2)");
    }

    #[test]
    fn renders_fully_resolved_plural_join() {
        let recs = records(vec![json!({"fileIds": [1, 2]})]);
        let table = schema::analyze(&recs);
        let resolved = resolved_files(vec![(1, "a.pdf"), (2, "b.pdf")]);

        let rules = FormatRules::default();
        let formatter = RecordFormatter::new(REFERENCE_TYPES, &rules);
        let model = formatter.render(&recs, &table, &resolved);

        assert_eq!(model.rows[0][0], "a.pdf, b.pdf");
    }

    #[test]
    fn absent_or_null_singular_reference_renders_empty() {
        let recs = records(vec![
            json!({"clientId": null, "status": "open"}),
            json!({"clientId": 4, "status": "closed"}),
        ]);
        let table = schema::analyze(&recs);

        let mut resolved = ResolvedReferences::new();
        resolved.insert(
            "client",
            [(ReferenceId::from(4), "Acme".to_string())].into_iter().collect(),
        );

        let rules = FormatRules::default();
        let formatter = RecordFormatter::new(REFERENCE_TYPES, &rules);
        let model = formatter.render(&recs, &table, &resolved);

        assert_eq!(model.rows[0][0], "");
        assert_eq!(model.rows[1][0], "Acme");
    }

    #[test]
    fn configured_booleans_render_yes_no() {
        let recs = records(vec![json!({"warranty": true, "active": false})]);
        let table = schema::analyze(&recs);

        let rules = FormatRules::default();
        let formatter = RecordFormatter::new(REFERENCE_TYPES, &rules);
        let model = formatter.render(&recs, &table, &ResolvedReferences::new());

        assert_eq!(model.rows[0], vec!["Yes", "No"]);
    }

    #[test]
    fn unconfigured_boolean_renders_raw() {
        let recs = records(vec![json!({"flagged": true})]);
        let table = schema::analyze(&recs);

        let rules = FormatRules::default();
        let formatter = RecordFormatter::new(REFERENCE_TYPES, &rules);
        let model = formatter.render(&recs, &table, &ResolvedReferences::new());

        assert_eq!(model.rows[0][0], "true");
    }

    #[test]
    fn timestamps_reformat_and_tolerate_garbage() {
        let recs = records(vec![json!({
            "createdAt": "2024-03-05T14:30:00+01:00",
            "modifiedAt": "not a date"
        })]);
        let table = schema::analyze(&recs);

        let rules = FormatRules::default();
        let formatter = RecordFormatter::new(REFERENCE_TYPES, &rules);
        let model = formatter.render(&recs, &table, &ResolvedReferences::new());

        let created = model
            .headers
            .iter()
            .position(|h| h.key == "createdAt")
            .expect("createdAt column");
        let modified = model
            .headers
            .iter()
            .position(|h| h.key == "modifiedAt")
            .expect("modifiedAt column");
        assert_eq!(model.rows[0][created], "2024-03-05 14:30");
        assert_eq!(model.rows[0][modified], "not a date");
    }

    #[test]
    fn attribute_cells_pass_through_with_empty_default() {
        let recs = records(vec![
            json!({"attributes": {"a": 1}}),
            json!({"attributes": {"b": 2}}),
        ]);
        let table = schema::analyze(&recs);

        let rules = FormatRules::default();
        let formatter = RecordFormatter::new(REFERENCE_TYPES, &rules);
        let model = formatter.render(&recs, &table, &ResolvedReferences::new());

        assert_eq!(
            model.headers.iter().map(|h| h.key.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert_eq!(model.rows[0], vec!["1", ""]);
        assert_eq!(model.rows[1], vec!["", "2"]);
    }

    #[test]
    fn null_and_nested_values_follow_scalar_rules() {
        let recs = records(vec![json!({
            "note": null,
            "diagnostics": {"code": 5}
        })]);
        let table = schema::analyze(&recs);

        let rules = FormatRules::default();
        let formatter = RecordFormatter::new(REFERENCE_TYPES, &rules);
        let model = formatter.render(&recs, &table, &ResolvedReferences::new());

        assert_eq!(model.rows[0][0], "");
        assert_eq!(model.rows[0][1], r#"{"code":5}"#);
    }
}
