//! Core ontology model types.
//!
//! These types represent a structurally typed domain model as owned Rust data:
//! entity definitions and their fields, the relationship (edge) catalog,
//! per-entity state machines, the service operation catalog, and the curated
//! override catalogs. The top-level container is [`Ontology`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::value::ValueTree;

/// A single field of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name as declared (snake_case).
    pub name: String,
    /// The field's type and constraints.
    pub value: ValueTree,
    /// Whether the field may be omitted.
    #[serde(default)]
    pub optional: bool,
}

impl FieldDefinition {
    /// A required field.
    #[must_use]
    pub fn required(name: &str, value: ValueTree) -> Self {
        Self {
            name: name.to_owned(),
            value,
            optional: false,
        }
    }

    /// An optional field.
    #[must_use]
    pub fn optional(name: &str, value: ValueTree) -> Self {
        Self {
            name: name.to_owned(),
            value,
            optional: true,
        }
    }
}

/// A named entity and its ordered fields.
///
/// Shared structure between entities is expressed by value-tree conjunction
/// and arrives here already flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// Entity name (PascalCase, unique within the ontology).
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDefinition>,
}

impl EntityDefinition {
    /// Stable snake_case identifier (`WorkOrder` → `work_order`). Unique
    /// across a linked ontology.
    #[must_use]
    pub fn id(&self) -> String {
        to_snake_case(&self.name)
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Converts a camelCase or PascalCase label into a snake_case identifier.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let chars: Vec<char> = s.chars().collect();
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                // No underscore inside an acronym run (e.g. "HVACUnit" → "hvac_unit")
                let prev = chars[i - 1];
                let next_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
                let boundary = prev.is_lowercase() || prev.is_ascii_digit();
                if boundary || (prev.is_uppercase() && next_lower) {
                    result.push('_');
                }
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// Cardinality of a relationship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// One source, one target.
    OneToOne,
    /// One source, many targets.
    OneToMany,
    /// Many sources, one target.
    ManyToOne,
    /// Many sources, many targets.
    ManyToMany,
}

impl Cardinality {
    /// Returns the wire name (`one_to_many`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::OneToOne => "one_to_one",
            Cardinality::OneToMany => "one_to_many",
            Cardinality::ManyToOne => "many_to_one",
            Cardinality::ManyToMany => "many_to_many",
        }
    }

    /// The cardinality seen from the other end of the edge.
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Cardinality::OneToMany => Cardinality::ManyToOne,
            Cardinality::ManyToOne => Cardinality::OneToMany,
            other => other,
        }
    }
}

/// A directed, named edge between two entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Source entity name.
    pub from: String,
    /// Target entity name.
    pub to: String,
    /// Edge name, read from the source (e.g. `owner`).
    pub edge: String,
    /// Edge name, read from the target (e.g. `owned_properties`).
    pub inverse: String,
    /// Edge cardinality.
    pub cardinality: Cardinality,
    /// Whether every source must have the edge.
    #[serde(default)]
    pub required: bool,
}

/// Lifecycle transitions for one entity: state → allowed target states.
///
/// A state with an empty target set is terminal. States that only ever
/// appear as targets are treated as having an empty target set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateMachine {
    /// Declared transitions.
    pub transitions: BTreeMap<String, BTreeSet<String>>,
}

impl StateMachine {
    /// Builds a machine from `(state, targets)` pairs.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Self {
        let transitions = pairs
            .iter()
            .map(|(state, targets)| {
                let targets = targets.iter().map(|t| (*t).to_owned()).collect();
                ((*state).to_owned(), targets)
            })
            .collect();
        Self { transitions }
    }
}

/// The kind of a catalogued service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Create a record.
    Create,
    /// Fetch one record.
    Get,
    /// List records.
    List,
    /// Update a record.
    Update,
    /// Delete a record.
    Delete,
    /// Move a record to another lifecycle state.
    Transition,
}

impl OperationKind {
    /// Returns the wire name (`create`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Get => "get",
            OperationKind::List => "list",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
            OperationKind::Transition => "transition",
        }
    }
}

/// One entry of the service operation catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Owning service name.
    pub service: String,
    /// Base path of the entity's resource (e.g. `/api/leases`).
    pub base_path: String,
    /// Entity name the operation acts on.
    pub entity: String,
    /// Operation kind.
    pub kind: OperationKind,
    /// Path segment appended after `{id}` (transitions and custom actions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Target state, for transitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_state: Option<String>,
    /// Extra fields the request must carry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_fields: Vec<String>,
    /// Hand-written operation, excluded from generated bindings.
    #[serde(default)]
    pub custom: bool,
}

/// Display overrides for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDisplayOverride {
    /// Singular display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Plural display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    /// Primary display template (e.g. `{street} {unit_number}`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_display: Option<String>,
}

/// A curated enum value and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedValue {
    /// Wire value.
    pub value: String,
    /// Display label.
    pub label: String,
}

/// A curated grouping of enum values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumGroup {
    /// Group id.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Member values.
    pub values: Vec<String>,
}

/// Curated labels and groups for one enum identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumOverride {
    /// Curated values in curated order.
    pub values: Vec<CuratedValue>,
    /// Named groups.
    pub groups: Vec<EnumGroup>,
}

/// The optional, sparse override catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    /// Entity name → display overrides.
    pub entities: BTreeMap<String, EntityDisplayOverride>,
    /// Enum identifier → curated values and groups.
    pub enums: BTreeMap<String, EnumOverride>,
}

/// A complete ontology bundle: the compiler's single input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ontology {
    /// Bundle version.
    pub version: String,
    /// Entity definitions, in declaration order.
    pub entities: Vec<EntityDefinition>,
    /// Named definitions that references resolve against.
    pub definitions: BTreeMap<String, ValueTree>,
    /// The relationship catalog.
    pub relationships: Vec<Relationship>,
    /// Entity name → lifecycle state machine.
    pub state_machines: BTreeMap<String, StateMachine>,
    /// The service operation catalog.
    pub operations: Vec<Operation>,
    /// Curated override catalogs.
    pub overrides: Overrides,
}

impl Ontology {
    /// Looks up an entity by name. Returns `None` if not found.
    #[must_use]
    pub fn find_entity(&self, name: &str) -> Option<&EntityDefinition> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Returns the total number of fields across all entities.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.entities.iter().map(|e| e.fields.len()).sum()
    }

    /// Returns the operations catalogued for an entity.
    pub fn operations_for<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a Operation> {
        self.operations.iter().filter(move |op| op.entity == entity)
    }
}
