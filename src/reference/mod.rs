//! Reference-type configuration.
//!
//! Each reference type names the record fields that carry its identifiers
//! and how a resolved entity is turned into a display string. The table is
//! static: the backend exposes a fixed set of referenceable entity types.

pub mod collector;
pub mod http;
pub mod resolver;

use serde_json::Value;

use crate::record::ReferenceId;

/// Extracts the display string from a resolved entity payload.
pub type DisplayFieldExtractor = fn(&Value) -> Option<String>;

/// Static configuration for one reference type.
pub struct ReferenceTypeDescriptor {
    /// Type name, also the key of its resolved map.
    pub name: &'static str,
    /// Record field holding one identifier.
    pub singular_field: &'static str,
    /// Record field holding an array of identifiers.
    pub plural_field: &'static str,
    /// Pulls the display value out of a looked-up entity.
    pub display: DisplayFieldExtractor,
}

impl ReferenceTypeDescriptor {
    /// Placeholder rendered for an identifier that could not be resolved.
    pub fn placeholder(&self, id: &ReferenceId) -> String {
        format!("Deleted ({id})")
    }
}

/// The reference types configured in this system.
pub static REFERENCE_TYPES: &[ReferenceTypeDescriptor] = &[
    ReferenceTypeDescriptor {
        name: "client",
        singular_field: "clientId",
        plural_field: "clientIds",
        display: name_field,
    },
    ReferenceTypeDescriptor {
        name: "classificator",
        singular_field: "classificatorId",
        plural_field: "classificatorIds",
        display: name_field,
    },
    ReferenceTypeDescriptor {
        name: "location",
        singular_field: "locationId",
        plural_field: "locationIds",
        display: name_field,
    },
    ReferenceTypeDescriptor {
        name: "maintenance",
        singular_field: "maintenanceId",
        plural_field: "maintenanceIds",
        display: name_field,
    },
    ReferenceTypeDescriptor {
        name: "file",
        singular_field: "fileId",
        plural_field: "fileIds",
        display: file_name_field,
    },
    ReferenceTypeDescriptor {
        name: "comment",
        singular_field: "commentId",
        plural_field: "commentIds",
        display: text_field,
    },
    ReferenceTypeDescriptor {
        name: "thirdPartyIT",
        singular_field: "thirdPartyITId",
        plural_field: "thirdPartyITIds",
        display: name_field,
    },
];

fn string_field(entity: &Value, field: &str) -> Option<String> {
    entity.get(field).and_then(Value::as_str).map(str::to_owned)
}

fn name_field(entity: &Value) -> Option<String> {
    string_field(entity, "name")
}

fn file_name_field(entity: &Value) -> Option<String> {
    string_field(entity, "fileName")
}

fn text_field(entity: &Value) -> Option<String> {
    string_field(entity, "text")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn placeholder_carries_the_identifier() {
        let descriptor = &REFERENCE_TYPES[0];
        assert_eq!(
            descriptor.placeholder(&ReferenceId::from(17)),
            "Deleted (17)"
        );
    }

    #[test]
    fn display_extractors_read_their_configured_field() {
        let by_name = |name: &str| {
            REFERENCE_TYPES
                .iter()
                .find(|d| d.name == name)
                .expect("type must be configured")
        };

        let client = by_name("client");
        assert_eq!(
            (client.display)(&json!({"name": "Acme GmbH"})),
            Some("Acme GmbH".to_string())
        );

        let file = by_name("file");
        assert_eq!(
            (file.display)(&json!({"fileName": "invoice.pdf"})),
            Some("invoice.pdf".to_string())
        );
        assert_eq!((file.display)(&json!({"name": "wrong field"})), None);

        let comment = by_name("comment");
        assert_eq!(
            (comment.display)(&json!({"text": "replaced fan"})),
            Some("replaced fan".to_string())
        );
    }
}
