//! Shared value types and helpers used across the reference domain.

use std::collections::BTreeMap;

use crate::model::{Operation, OperationKind};
use crate::value::{Kind, ValueTree};

/// Returns the named definitions shared by every entity.
#[must_use]
pub fn definitions() -> BTreeMap<String, ValueTree> {
    let mut defs = BTreeMap::new();
    defs.insert("#Money".to_owned(), ValueTree::of(Kind::Struct));
    defs.insert("#NonNegativeMoney".to_owned(), ValueTree::of(Kind::Struct));
    defs.insert("#PositiveMoney".to_owned(), ValueTree::of(Kind::Struct));
    defs.insert("#Address".to_owned(), ValueTree::of(Kind::Struct));
    defs.insert("#ContactMethod".to_owned(), ValueTree::of(Kind::Struct));
    defs.insert("#Document".to_owned(), ValueTree::of(Kind::Struct));
    defs.insert("#LeaseType".to_owned(), lease_type_def());
    defs.insert("#PropertyType".to_owned(), property_type_def());
    defs
}

fn lease_type_def() -> ValueTree {
    ValueTree::one_of(&["fixed_term", "month_to_month", "commercial"])
}

fn property_type_def() -> ValueTree {
    ValueTree::one_of(&[
        "single_family",
        "multi_family",
        "condo",
        "commercial",
        "mixed_use",
    ])
}

/// A reference to a named definition with the link already in place.
#[must_use]
pub fn linked(path: &str) -> ValueTree {
    let defs = definitions();
    let def = defs.get(path).cloned().unwrap_or_else(ValueTree::top);
    let mut v = ValueTree::named(path, def.kind);
    v.definition = Some(Box::new(def));
    v
}

/// A list buried in a conjunction, the way conditional blocks declare it.
#[must_use]
pub fn conditional_list(element: ValueTree) -> ValueTree {
    ValueTree::all_of(vec![ValueTree::top(), ValueTree::list_of(element)])
}

/// `id: string` (system assigned).
#[must_use]
pub fn id() -> ValueTree {
    ValueTree::string().immutable().computed()
}

/// `created_at` / `updated_at` style system timestamps.
#[must_use]
pub fn timestamp() -> ValueTree {
    ValueTree::time().computed()
}

/// The standard five CRUD entries for an entity's service.
#[must_use]
pub fn crud(service: &str, entity: &str, base_path: &str) -> Vec<Operation> {
    [
        OperationKind::Create,
        OperationKind::Get,
        OperationKind::List,
        OperationKind::Update,
        OperationKind::Delete,
    ]
    .into_iter()
    .map(|kind| Operation {
        service: service.to_owned(),
        base_path: base_path.to_owned(),
        entity: entity.to_owned(),
        kind,
        path: None,
        target_state: None,
        required_fields: Vec::new(),
        custom: false,
    })
    .collect()
}

/// A catalogued transition operation.
#[must_use]
pub fn transition(
    service: &str,
    entity: &str,
    base_path: &str,
    path: &str,
    target: &str,
    required: &[&str],
) -> Operation {
    Operation {
        service: service.to_owned(),
        base_path: base_path.to_owned(),
        entity: entity.to_owned(),
        kind: OperationKind::Transition,
        path: Some(path.to_owned()),
        target_state: Some(target.to_owned()),
        required_fields: required.iter().map(|f| (*f).to_owned()).collect(),
        custom: false,
    }
}
