//! Entity, relationship, and state-machine loading.
//!
//! Turns a linked [`Ontology`] into the compiler's working model: one
//! [`CompiledEntity`] per entity with its first-pass field descriptors, the
//! relationship and operation catalogs, and a closed [`StateGraph`] per
//! state machine. The first pass classifies with empty lookups, so no field
//! is an entity reference yet.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;
use ui_ontology::{EntityDefinition, Ontology, Operation, Overrides, Relationship, StateMachine};

use crate::classify::{Classifier, Lookups};
use crate::document::FieldDescriptor;

/// A state machine in which every state, including target-only ones, has an
/// entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateGraph {
    transitions: BTreeMap<String, BTreeSet<String>>,
}

impl StateGraph {
    /// Closes a declared machine over its target states.
    #[must_use]
    pub fn from_machine(machine: &StateMachine) -> Self {
        let mut transitions = machine.transitions.clone();
        for targets in machine.transitions.values() {
            for target in targets {
                transitions.entry(target.clone()).or_default();
            }
        }
        Self { transitions }
    }

    /// Every state, sorted.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.transitions.keys().map(String::as_str)
    }

    /// Targets reachable in one step from `state`.
    pub fn targets(&self, state: &str) -> impl Iterator<Item = &str> {
        self.transitions
            .get(state)
            .into_iter()
            .flat_map(|t| t.iter().map(String::as_str))
    }

    /// Returns true if the state has no way out.
    #[must_use]
    pub fn is_terminal(&self, state: &str) -> bool {
        self.transitions.get(state).is_some_and(BTreeSet::is_empty)
    }

    /// Returns true if no transition leads to the state.
    #[must_use]
    pub fn is_initial(&self, state: &str) -> bool {
        let targeted = self.transitions.values().any(|t| t.contains(state));
        self.transitions.contains_key(state) && !targeted
    }

    /// Returns true if the state is part of the graph.
    #[must_use]
    pub fn contains(&self, state: &str) -> bool {
        self.transitions.contains_key(state)
    }
}

/// An entity with its classified fields.
#[derive(Debug, Clone)]
pub struct CompiledEntity {
    /// Entity id (snake_case of the name).
    pub id: String,
    /// The entity's definition.
    pub definition: EntityDefinition,
    /// Descriptors of every field with a UI representation, in declaration
    /// order.
    pub fields: Vec<FieldDescriptor>,
}

impl CompiledEntity {
    /// Entity name as declared.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Looks up a descriptor by field name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The compiler's working model of one ontology.
#[derive(Debug, Clone)]
pub struct CompiledModel {
    /// Ontology version.
    pub version: String,
    /// Entities in declaration order.
    pub entities: Vec<CompiledEntity>,
    /// The relationship catalog.
    pub relationships: Vec<Relationship>,
    /// Entity name → closed state graph.
    pub state_graphs: BTreeMap<String, StateGraph>,
    /// The operation catalog.
    pub operations: Vec<Operation>,
    /// Curated overrides.
    pub overrides: Overrides,
    /// Reference lookups; empty until the resolver runs.
    pub lookups: Lookups,
}

impl CompiledModel {
    /// Looks up an entity by name.
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&CompiledEntity> {
        self.entities.iter().find(|e| e.name() == name)
    }

    /// Total number of field descriptors.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.entities.iter().map(|e| e.fields.len()).sum()
    }
}

/// Builds the working model with first-pass classification.
#[must_use]
pub fn load_model(ontology: &Ontology, classifier: &Classifier) -> CompiledModel {
    let empty = Lookups::default();
    let entities: Vec<CompiledEntity> = ontology
        .entities
        .iter()
        .map(|def| CompiledEntity {
            id: def.id(),
            fields: def
                .fields
                .iter()
                .filter_map(|f| classifier.classify(f, &empty))
                .collect(),
            definition: def.clone(),
        })
        .collect();

    let state_graphs = ontology
        .state_machines
        .iter()
        .map(|(entity, machine)| {
            let graph = StateGraph::from_machine(machine);
            (entity.clone(), graph)
        })
        .collect();

    let model = CompiledModel {
        version: ontology.version.clone(),
        entities,
        relationships: ontology.relationships.clone(),
        state_graphs,
        operations: ontology.operations.clone(),
        overrides: ontology.overrides.clone(),
        lookups: empty,
    };
    info!(
        entities = model.entities.len(),
        fields = model.field_count(),
        relationships = model.relationships.len(),
        "loaded ontology model"
    );
    model
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::FieldType;

    #[test]
    fn target_only_states_are_terminal() {
        let machine = StateMachine::from_pairs(&[("draft", &["pending_approval", "terminated"])]);
        let graph = StateGraph::from_machine(&machine);
        assert!(graph.is_terminal("pending_approval"));
        assert!(graph.is_terminal("terminated"));
        assert!(!graph.is_terminal("draft"));
        assert!(graph.is_initial("draft"));
        assert!(!graph.is_initial("terminated"));
        assert_eq!(graph.states().count(), 3);
    }

    #[test]
    fn first_pass_has_no_references() {
        let model = load_model(&Ontology::sample(), &Classifier::default());
        assert_eq!(model.entities.len(), 6);
        let property = model.entity("Property").unwrap();
        assert_eq!(property.id, "property");
        let owner = property.field("owner_id").unwrap();
        assert_eq!(owner.field_type, FieldType::String);
        let work_order = model.entity("WorkOrder").unwrap();
        assert_eq!(work_order.id, "work_order");
        assert!(model.lookups.entities.is_empty());
    }
}
