//! End-to-end compiler tests over the reference ontology and small
//! hand-built ontologies.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use ui_ontology::{
    Cardinality, EntityDefinition, FieldDefinition, LoadError, Ontology, Relationship,
    StateMachine, ValueTree,
};
use ui_schema_codegen::classify::Classifier;
use ui_schema_codegen::document::{ActionVariant, FieldRule, StatusColor};
use ui_schema_codegen::{
    compile, generate, loader, resolve, CompileError, CompilerConfig, EmitError, FieldType,
};

fn entity(name: &str, fields: Vec<FieldDefinition>) -> EntityDefinition {
    EntityDefinition {
        name: name.to_owned(),
        fields,
    }
}

fn lease_only() -> Ontology {
    let mut state_machines = BTreeMap::new();
    state_machines.insert(
        "Lease".to_owned(),
        StateMachine::from_pairs(&[
            ("draft", &["pending_approval", "terminated"]),
            ("pending_approval", &[]),
        ]),
    );
    Ontology {
        version: "test".to_owned(),
        entities: vec![entity(
            "Lease",
            vec![
                FieldDefinition::required("id", ValueTree::string().computed()),
                FieldDefinition::required(
                    "status",
                    ValueTree::one_of(&["draft", "pending_approval", "terminated"])
                        .with_default("draft"),
                ),
                FieldDefinition::optional("termination_reason", ValueTree::string().text()),
                FieldDefinition::required("updated_at", ValueTree::time().computed()),
            ],
        )],
        state_machines,
        ..Ontology::default()
    }
}

fn property_and_owner() -> Ontology {
    let org_name = FieldDefinition::required("name", ValueTree::string().display());
    Ontology {
        version: "test".to_owned(),
        entities: vec![
            entity("Organization", vec![org_name]),
            entity(
                "Property",
                vec![
                    FieldDefinition::required("name", ValueTree::string().display()),
                    FieldDefinition::required("owner_id", ValueTree::string()),
                    FieldDefinition::optional("landlord_id", ValueTree::string()),
                ],
            ),
        ],
        relationships: vec![Relationship {
            from: "Property".to_owned(),
            to: "Organization".to_owned(),
            edge: "owner".to_owned(),
            inverse: "owned_properties".to_owned(),
            cardinality: Cardinality::ManyToOne,
            required: true,
        }],
        ..Ontology::default()
    }
}

#[test]
fn lease_termination_from_draft_is_dangerous() {
    let compilation = compile(&lease_only(), &CompilerConfig::default()).unwrap();
    let lease = &compilation.documents["lease"];
    let machine = lease.state_machine.as_ref().unwrap();

    let terminate = machine
        .transitions
        .iter()
        .find(|t| t.from == "draft" && t.to == "terminated")
        .unwrap();
    assert_eq!(terminate.variant, ActionVariant::Danger);
    assert!(terminate.confirm);
    let message = terminate.confirm_message.as_deref();
    assert!(message.is_some_and(|m| !m.is_empty()));
    assert_eq!(terminate.label, "Cancel");

    let status = lease.status.as_ref().unwrap();
    assert!(status.terminal.contains(&"pending_approval".to_owned()));
    assert_eq!(status.colors["pending_approval"], StatusColor::Gray);
    assert_eq!(status.enum_ref.as_deref(), Some("LeaseStatus"));
    let states = ["draft", "pending_approval", "terminated"];
    assert_eq!(machine.states, states);
}

#[test]
fn owner_id_needs_the_second_pass() {
    let ontology = property_and_owner();
    let classifier = Classifier::default();
    let mut model = loader::load_model(&ontology, &classifier);
    let property = model.entity("Property").unwrap();
    let first = property.field("owner_id").unwrap().clone();
    assert_eq!(first.field_type, FieldType::String);
    assert!(first.target.is_none());

    let upgraded = resolve::resolve(&mut model, &classifier);
    assert_eq!(upgraded, 1);
    let property = model.entity("Property").unwrap();
    let second = property.field("owner_id").unwrap();
    assert_eq!(second.field_type, FieldType::EntityRef);
    assert_eq!(second.target.as_deref(), Some("organization"));

    let unresolved = property.field("landlord_id").unwrap();
    assert_eq!(unresolved.field_type, FieldType::String);
}

#[test]
fn sample_references_resolve() {
    let compilation = compile(&Ontology::sample(), &CompilerConfig::default()).unwrap();
    let lease = &compilation.documents["lease"];
    let tenants = lease.field("tenant_ids").unwrap();
    assert_eq!(tenants.field_type, FieldType::EntityRefList);
    assert_eq!(tenants.target.as_deref(), Some("person"));

    let wo = &compilation.documents["work_order"];
    let target = |name: &str| wo.field(name).unwrap().target.as_deref();
    assert_eq!(target("assigned_vendor_id"), Some("organization"));
    assert_eq!(target("requester_id"), Some("person"));
    let checklist = wo.field("checklist").unwrap();
    assert_eq!(checklist.field_type, FieldType::StringList);
    assert!(compilation.upgraded_references >= 8);
}

#[test]
fn runs_are_byte_identical() {
    let config = CompilerConfig::default();
    let a = compile(&Ontology::sample(), &config).unwrap();
    let b = compile(&Ontology::sample(), &config).unwrap();
    assert_eq!(a.output, b.output);

    let bundle = serde_json::to_string(&Ontology::sample()).unwrap();
    let reloaded = Ontology::from_json_str(&bundle).unwrap();
    let c = compile(&reloaded, &config).unwrap();
    assert_eq!(a.output, c.output);
}

#[test]
fn enum_catalog_keeps_every_ontology_value() {
    let ontology = Ontology::sample();
    let compilation = compile(&ontology, &CompilerConfig::default()).unwrap();
    for doc in compilation.documents.values() {
        for field in &doc.fields {
            let Some(id) = field.enum_ref.as_ref() else {
                continue;
            };
            let merged: Vec<&str> = compilation.catalog.enums[id]
                .values
                .iter()
                .map(|v| v.value.as_str())
                .collect();
            let positions: Vec<usize> = field
                .enum_values
                .iter()
                .map(|v| merged.iter().position(|m| m == v).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "{id} reordered");
        }
    }
    let status = &compilation.catalog.enums["LeaseStatus"];
    let values: Vec<&str> = status.values.iter().map(|v| v.value.as_str()).collect();
    let expected = ["draft", "pending_approval", "active", "expired", "terminated"];
    assert_eq!(values, expected);
}

#[test]
fn money_variants_drive_minimums() {
    let compilation = compile(&Ontology::sample(), &CompilerConfig::default()).unwrap();
    let lease = &compilation.documents["lease"];
    let min_of = |field: &str| {
        lease
            .validation
            .fields
            .iter()
            .find(|v| v.field == field)
            .and_then(|v| {
                v.rules.iter().find_map(|r| match r {
                    FieldRule::Min { value, .. } => Some(*value),
                    _ => None,
                })
            })
    };
    assert_eq!(min_of("rent_amount"), Some(1.0));
    assert_eq!(min_of("security_deposit"), Some(0.0));
}

#[test]
fn list_columns_respect_the_cap() {
    for max in [1, 3, 6, 10] {
        let config = CompilerConfig {
            max_list_columns: max,
            ..CompilerConfig::default()
        };
        let compilation = compile(&Ontology::sample(), &config).unwrap();
        for doc in compilation.documents.values() {
            assert!(doc.list.columns.len() <= max);
            assert_eq!(doc.list.columns.last().unwrap().field, "updated_at");
        }
    }
}

#[test]
fn generate_writes_every_document() {
    let dir = tempfile::tempdir().unwrap();
    let report = generate(&Ontology::sample(), dir.path(), &CompilerConfig::default()).unwrap();
    assert_eq!(report.entity_count, 6);
    assert_eq!(report.files.len(), 7);
    assert_eq!(report.files[0], "_enums.schema.json");
    for name in &report.files {
        let text = std::fs::read_to_string(dir.path().join(name)).unwrap();
        assert!(text.ends_with("}\n"));
        let _: serde_json::Value = serde_json::from_str(&text).unwrap();
    }
    let text = std::fs::read_to_string(dir.path().join("lease.schema.json")).unwrap();
    let lease: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(lease["entity"], "lease");
    assert_eq!(lease["api"]["base_path"], "/api/leases");
}

#[test]
fn lease_form_follows_template() {
    let compilation = compile(&Ontology::sample(), &CompilerConfig::default()).unwrap();
    let lease = &compilation.documents["lease"];
    let ids: Vec<&str> = lease.form.sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids.first(), Some(&"lease"));
    assert!(ids.contains(&"termination"));
    let additional = lease.form.sections.iter().find(|s| s.id == "additional");
    let additional = additional.unwrap();
    assert!(additional.fields.contains(&"signed_at".to_owned()));
    assert!(!additional.fields.contains(&"legacy_code".to_owned()));

    let approve = lease
        .state_machine
        .as_ref()
        .unwrap()
        .transitions
        .iter()
        .find(|t| t.from == "pending_approval" && t.to == "active")
        .unwrap();
    assert_eq!(approve.endpoint.path, "/api/leases/{id}/approve");
    assert_eq!(approve.required_fields, vec!["signed_at"]);
}

#[test]
fn entity_names_sharing_an_id_are_rejected() {
    let ontology = Ontology {
        version: "test".to_owned(),
        entities: vec![entity("HVACUnit", vec![]), entity("HvacUnit", vec![])],
        ..Ontology::default()
    };
    let err = compile(&ontology, &CompilerConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Load(LoadError::EntityIdCollision { ref id, .. }) if id == "hvac_unit"
    ));
}

#[test]
fn scoped_enum_does_not_merge_into_canonical_one() {
    let unit_type = FieldDefinition::required("type", ValueTree::one_of(&["studio", "loft"]));
    let kinds = ValueTree::one_of(&["residential", "commercial"]);
    let listing_type = FieldDefinition::required("unit_type", kinds);
    let ontology = Ontology {
        version: "test".to_owned(),
        entities: vec![
            entity("Unit", vec![unit_type]),
            entity("Listing", vec![listing_type]),
        ],
        ..Ontology::default()
    };
    let compilation = compile(&ontology, &CompilerConfig::default()).unwrap();
    let values = |id: &str| -> Vec<String> {
        compilation.catalog.enums[id]
            .values
            .iter()
            .map(|v| v.value.clone())
            .collect()
    };
    assert_eq!(values("UnitType"), vec!["residential", "commercial"]);
    assert_eq!(values("UnitTypeEnum"), vec!["studio", "loft"]);
    let unit = &compilation.documents["unit"];
    assert_eq!(
        unit.field("type").unwrap().enum_ref.as_deref(),
        Some("UnitTypeEnum")
    );
}

#[test]
fn catalog_name_must_sort_first() {
    for stem in ["lease", "zz_enums"] {
        let config = CompilerConfig {
            enum_catalog_name: stem.to_owned(),
            ..CompilerConfig::default()
        };
        let err = compile(&Ontology::sample(), &config).unwrap_err();
        assert!(
            matches!(err, CompileError::Emit(EmitError::CatalogName { .. })),
            "{stem}: {err}"
        );
    }
    let config = CompilerConfig {
        enum_catalog_name: "_catalog".to_owned(),
        ..CompilerConfig::default()
    };
    let compilation = compile(&Ontology::sample(), &config).unwrap();
    assert_eq!(
        compilation.output.names().next(),
        Some("_catalog.schema.json")
    );
}
