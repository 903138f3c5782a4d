//! Cross-reference resolution: the second classification pass.
//!
//! `_id` / `_ids` fields can only be recognized as entity references once
//! every entity name and relationship edge name is known. After loading,
//! [`build_lookups`] collects both tables and [`resolve`] re-classifies the
//! fields the first pass left as plain strings.

use std::collections::btree_map::Entry;

use tracing::{debug, info};

use crate::classify::{Classifier, Lookups};
use crate::document::FieldType;
use crate::loader::CompiledModel;
use crate::mapping::{reference_prefix, to_snake_case};

/// Builds the entity-id set and the edge → target-entity map. On a duplicate
/// edge name the first declaration wins.
#[must_use]
pub fn build_lookups(model: &CompiledModel) -> Lookups {
    let mut lookups = Lookups::default();
    for entity in &model.entities {
        lookups.entities.insert(entity.id.clone());
    }
    for rel in &model.relationships {
        let target = to_snake_case(&rel.to);
        match lookups.edges.entry(rel.edge.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(target);
            }
            Entry::Occupied(existing) if *existing.get() != target => {
                debug!(
                    edge = %rel.edge,
                    kept = %existing.get(),
                    ignored = %target,
                    "duplicate edge name"
                );
            }
            Entry::Occupied(_) => {}
        }
    }
    lookups
}

fn is_candidate(field_type: FieldType, name: &str) -> bool {
    matches!(field_type, FieldType::String | FieldType::StringList)
        && reference_prefix(name).is_some()
}

/// Populates the model's lookups and upgrades unresolved `_id` / `_ids`
/// fields. Returns the number of fields upgraded.
pub fn resolve(model: &mut CompiledModel, classifier: &Classifier) -> usize {
    let lookups = build_lookups(model);
    let mut upgraded = 0;

    for entity in &mut model.entities {
        for descriptor in &mut entity.fields {
            if !is_candidate(descriptor.field_type, &descriptor.name) {
                continue;
            }
            let Some(definition) = entity.definition.field(&descriptor.name) else {
                continue;
            };
            let Some(resolved) = classifier.classify(definition, &lookups) else {
                continue;
            };
            if resolved.field_type != descriptor.field_type {
                debug!(
                    entity = %entity.definition.name,
                    field = %descriptor.name,
                    target = resolved.target.as_deref().unwrap_or_default(),
                    "resolved entity reference"
                );
                *descriptor = resolved;
                upgraded += 1;
            }
        }
    }

    info!(upgraded, "cross-reference resolution complete");
    model.lookups = lookups;
    upgraded
}
