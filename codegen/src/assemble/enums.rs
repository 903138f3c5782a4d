//! Enum detection and override merging.
//!
//! Collects every `enum` field across the model under its enum identifier,
//! then merges each identifier's values with the curated override catalog.

use std::collections::BTreeMap;

use ui_ontology::EnumOverride;

use crate::document::{EnumDefinition, EnumValue, EnumValueGroup, FieldType};
use crate::loader::CompiledModel;
use crate::mapping::humanize;
use crate::tables::enum_identifier;

/// An enum identifier and the ontology values gathered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedEnum {
    /// Enum identifier.
    pub id: String,
    /// Values in first-seen order across entities.
    pub values: Vec<String>,
}

/// Detects every enum in the model. Shared identifiers accumulate values
/// across entities in entity declaration order.
#[must_use]
pub fn detect_enums(model: &CompiledModel) -> Vec<DetectedEnum> {
    let mut enums: Vec<DetectedEnum> = Vec::new();
    for entity in &model.entities {
        let enum_fields = entity
            .fields
            .iter()
            .filter(|f| f.field_type == FieldType::Enum);
        for field in enum_fields {
            let id = enum_identifier(entity.name(), &field.name);
            let idx = match enums.iter().position(|e| e.id == id) {
                Some(idx) => idx,
                None => {
                    enums.push(DetectedEnum {
                        id,
                        values: Vec::new(),
                    });
                    enums.len() - 1
                }
            };
            let detected = &mut enums[idx];
            for value in &field.enum_values {
                if !detected.values.contains(value) {
                    detected.values.push(value.clone());
                }
            }
        }
    }
    enums
}

/// Merges ontology values with a curated override.
///
/// Ontology values come first, in declaration order, with curated labels
/// where curated and humanized labels otherwise. Curated values the ontology
/// does not declare follow in curated order. Groups keep only values present
/// in the result; empty groups are dropped.
#[must_use]
pub fn merge(
    id: &str,
    ontology_values: &[String],
    curated: Option<&EnumOverride>,
) -> EnumDefinition {
    let curated_label = |value: &str| {
        curated
            .and_then(|c| c.values.iter().find(|cv| cv.value == value))
            .map(|cv| cv.label.clone())
    };

    let mut values: Vec<EnumValue> = ontology_values
        .iter()
        .map(|v| EnumValue {
            value: v.clone(),
            label: curated_label(v).unwrap_or_else(|| humanize(v)),
        })
        .collect();

    if let Some(curated) = curated {
        for cv in &curated.values {
            if !values.iter().any(|v| v.value == cv.value) {
                values.push(EnumValue {
                    value: cv.value.clone(),
                    label: cv.label.clone(),
                });
            }
        }
    }

    let groups = curated
        .map(|c| c.groups.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(|g| {
            let members: Vec<String> = g
                .values
                .iter()
                .filter(|m| values.iter().any(|v| &v.value == *m))
                .cloned()
                .collect();
            (!members.is_empty()).then(|| EnumValueGroup {
                name: g.name.clone(),
                label: g.label.clone(),
                values: members,
            })
        })
        .collect();

    EnumDefinition {
        id: id.to_owned(),
        values,
        groups,
    }
}

/// Builds the merged catalog of every enum in the model.
#[must_use]
pub fn build_catalog(model: &CompiledModel) -> BTreeMap<String, EnumDefinition> {
    detect_enums(model)
        .into_iter()
        .map(|e| {
            let merged = merge(&e.id, &e.values, model.overrides.enums.get(&e.id));
            (e.id, merged)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::loader::load_model;
    use ui_ontology::{CuratedValue, EnumGroup, Ontology};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn merge_never_drops_ontology_values() {
        let curated = EnumOverride {
            values: vec![
                CuratedValue {
                    value: "retired".to_owned(),
                    label: "Retired".to_owned(),
                },
                CuratedValue {
                    value: "active".to_owned(),
                    label: "In Force".to_owned(),
                },
            ],
            groups: vec![EnumGroup {
                name: "live".to_owned(),
                label: "Live".to_owned(),
                values: strings(&["active", "pending_approval", "gone"]),
            }],
        };
        let ontology_values = strings(&["draft", "pending_approval", "active"]);
        let merged = merge("LeaseStatus", &ontology_values, Some(&curated));

        let values: Vec<&str> = merged.values.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(
            values,
            vec!["draft", "pending_approval", "active", "retired"]
        );
        assert_eq!(merged.values[1].label, "Pending Approval");
        assert_eq!(merged.values[2].label, "In Force");
        let live = strings(&["active", "pending_approval"]);
        assert_eq!(merged.groups[0].values, live);
    }

    #[test]
    fn merge_without_override_humanizes() {
        let merged = merge("UnitStatus", &strings(&["make_ready"]), None);
        assert_eq!(merged.values[0].label, "Make Ready");
        assert!(merged.groups.is_empty());
    }

    #[test]
    fn canonical_identifiers_are_shared() {
        let model = load_model(&Ontology::sample(), &Classifier::default());
        let enums = detect_enums(&model);
        let ids: Vec<&str> = enums.iter().map(|e| e.id.as_str()).collect();
        assert!(ids.contains(&"LeaseStatus"));
        assert!(ids.contains(&"WorkOrderPriority"));
        assert!(ids.contains(&"Role"));
        assert_eq!(ids.iter().filter(|id| **id == "PropertyType").count(), 1);

        let catalog = build_catalog(&model);
        let status = &catalog["LeaseStatus"];
        assert_eq!(status.values[0].value, "draft");
        assert!(status.values.iter().any(|v| v.label == "Terminated Early"));
    }
}
