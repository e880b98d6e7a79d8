//! Identifier collection over record lists.
//!
//! One read-only pass gathers, per reference type, the deduplicated set of
//! identifiers that will need resolution.

use std::collections::{HashMap, HashSet};

use crate::record::{HistoricalRecord, ReferenceId};

use super::ReferenceTypeDescriptor;

/// Unique identifiers per reference type, keyed by type name.
///
/// Types that occur nowhere in the records are absent; they issue zero
/// lookups.
pub type CollectedReferences = HashMap<&'static str, HashSet<ReferenceId>>;

/// Scan the records for reference fields.
///
/// A singular field contributes its identifier when present and non-null;
/// a plural field contributes each element of its array.
pub fn collect(
    records: &[HistoricalRecord],
    descriptors: &'static [ReferenceTypeDescriptor],
) -> CollectedReferences {
    let mut collected = CollectedReferences::new();

    for record in records {
        for descriptor in descriptors {
            let singular = record.reference_id(descriptor.singular_field);
            let plural = record.reference_ids(descriptor.plural_field);
            if singular.is_none() && plural.is_empty() {
                continue;
            }

            let ids = collected.entry(descriptor.name).or_default();
            if let Some(id) = singular {
                ids.insert(id);
            }
            ids.extend(plural);
        }
    }

    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::REFERENCE_TYPES;
    use serde_json::json;

    fn records(values: Vec<serde_json::Value>) -> Vec<HistoricalRecord> {
        values
            .into_iter()
            .map(|v| HistoricalRecord::from_value(v).expect("fixture must be an object"))
            .collect()
    }

    #[test]
    fn collects_singular_and_plural_fields_deduplicated() {
        let recs = records(vec![
            json!({"clientId": 1, "fileIds": [10, 11]}),
            json!({"clientId": 1, "fileIds": [11, 12]}),
        ]);
        let collected = collect(&recs, REFERENCE_TYPES);

        assert_eq!(collected["client"].len(), 1);
        assert_eq!(collected["file"].len(), 3);
        assert!(collected["file"].contains(&ReferenceId::from(12)));
    }

    #[test]
    fn null_singular_and_absent_fields_contribute_nothing() {
        let recs = records(vec![json!({"clientId": null, "status": "open"})]);
        let collected = collect(&recs, REFERENCE_TYPES);
        assert!(collected.is_empty());
    }

    #[test]
    fn types_without_occurrences_are_absent() {
        let recs = records(vec![json!({"locationId": 3})]);
        let collected = collect(&recs, REFERENCE_TYPES);
        assert_eq!(collected.len(), 1);
        assert!(collected.contains_key("location"));
        assert!(!collected.contains_key("comment"));
    }
}
