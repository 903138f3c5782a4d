//! Structurally typed domain ontology encoded as Rust data.
//!
//! The `ui-ontology` crate provides the input model of the UI schema compiler:
//! [`ValueTree`]s describing each field's type and constraints, entity
//! definitions, the relationship catalog, lifecycle state machines, the
//! service operation catalog, and the curated override catalogs. It also
//! provides the introspection primitives the classifier is built on and a
//! loader for JSON bundles.
//!
//! # Entry Points
//!
//! ```
//! let ontology = ui_ontology::Ontology::sample();
//! assert_eq!(ontology.entities.len(), 6);
//! ```
//!
//! ```no_run
//! use std::path::Path;
//!
//! let ontology = ui_ontology::Ontology::load(Path::new("ontology.json"))
//!     .expect("bundle should load");
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod introspect;
pub mod load;
pub mod model;
pub mod sample;
pub mod value;

pub use load::LoadError;
pub use model::{
    to_snake_case, Cardinality, CuratedValue, EntityDefinition, EntityDisplayOverride, EnumGroup,
    EnumOverride, FieldDefinition, Ontology, Operation, OperationKind, Overrides, Relationship,
    StateMachine,
};
pub use value::{Annotations, Bound, Bounds, Deprecation, Expression, Kind, Literal, ValueTree};

impl Ontology {
    /// Returns the reference property-management ontology.
    ///
    /// Assembly order follows the domain's dependency graph:
    /// `party → property → lease → work_order`.
    #[must_use]
    pub fn sample() -> Ontology {
        use sample::{common, lease, party, property, work_order};

        let mut state_machines = std::collections::BTreeMap::new();
        state_machines.insert("Lease".to_owned(), lease::state_machine());
        state_machines.insert("WorkOrder".to_owned(), work_order::state_machine());

        Ontology {
            version: "2024.2.0".to_owned(),
            entities: vec![
                party::organization(),
                party::person(),
                property::property(),
                property::unit(),
                lease::lease(),
                work_order::work_order(),
            ],
            definitions: common::definitions(),
            relationships: [
                party::relationships(),
                property::relationships(),
                lease::relationships(),
                work_order::relationships(),
            ]
            .concat(),
            state_machines,
            operations: [
                party::operations(),
                property::operations(),
                lease::operations(),
                work_order::operations(),
            ]
            .concat(),
            overrides: sample_overrides(),
        }
    }
}

fn sample_overrides() -> Overrides {
    let mut overrides = Overrides::default();
    overrides.entities.insert(
        "Lease".to_owned(),
        EntityDisplayOverride {
            display_name: Some("Lease Agreement".to_owned()),
            plural: Some("Lease Agreements".to_owned()),
            primary_display: Some("{lease_number}".to_owned()),
        },
    );
    overrides.entities.insert(
        "Person".to_owned(),
        EntityDisplayOverride {
            display_name: None,
            plural: Some("People".to_owned()),
            primary_display: Some("{first_name} {last_name}".to_owned()),
        },
    );
    overrides.entities.insert(
        "Property".to_owned(),
        EntityDisplayOverride {
            display_name: None,
            plural: Some("Properties".to_owned()),
            primary_display: None,
        },
    );

    let curated = |pairs: &[(&str, &str)]| -> Vec<CuratedValue> {
        pairs
            .iter()
            .map(|(value, label)| CuratedValue {
                value: (*value).to_owned(),
                label: (*label).to_owned(),
            })
            .collect()
    };
    overrides.enums.insert(
        "LeaseStatus".to_owned(),
        EnumOverride {
            values: curated(&[
                ("draft", "Draft"),
                ("active", "Active"),
                ("terminated", "Terminated Early"),
            ]),
            groups: vec![EnumGroup {
                name: "current".to_owned(),
                label: "Current".to_owned(),
                values: vec!["pending_approval".to_owned(), "active".to_owned()],
            }],
        },
    );
    overrides.enums.insert(
        "Role".to_owned(),
        EnumOverride {
            values: curated(&[
                ("vendor_contact", "Vendor Contact"),
                ("staff", "Staff Member"),
            ]),
            groups: Vec::new(),
        },
    );
    overrides.enums.insert(
        "WorkOrderPriority".to_owned(),
        EnumOverride {
            values: curated(&[
                ("emergency", "Emergency"),
                ("high", "High"),
                ("normal", "Normal"),
                ("low", "Low"),
            ]),
            groups: vec![EnumGroup {
                name: "urgent".to_owned(),
                label: "Urgent".to_owned(),
                values: vec!["emergency".to_owned(), "high".to_owned()],
            }],
        },
    );
    overrides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_count() {
        assert_eq!(Ontology::sample().entities.len(), 6);
    }

    #[test]
    fn all_entity_names_unique() {
        let mut names = std::collections::HashSet::new();
        for entity in &Ontology::sample().entities {
            let fresh = names.insert(entity.name.as_str());
            assert!(fresh, "duplicate entity {}", entity.name);
        }
    }

    #[test]
    fn sample_satisfies_the_load_contract() {
        let linked = Ontology::sample().link();
        assert!(linked.is_ok(), "sample failed to link: {linked:?}");
    }

    #[test]
    fn sample_round_trips_through_json() {
        let ontology = Ontology::sample();
        let json = serde_json::to_string(&ontology).unwrap_or_default();
        let reloaded = Ontology::from_json_str(&json);
        assert!(reloaded.is_ok());
        let reloaded = reloaded.unwrap_or_default();
        assert_eq!(reloaded.entities.len(), ontology.entities.len());
        assert_eq!(reloaded.field_count(), ontology.field_count());
    }

    #[test]
    fn every_state_machine_has_a_matching_entity() {
        let ontology = Ontology::sample();
        for name in ontology.state_machines.keys() {
            let entity = ontology.find_entity(name);
            assert!(entity.is_some(), "no entity for state machine {name}");
        }
    }
}
