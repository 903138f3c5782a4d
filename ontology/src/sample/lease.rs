//! Leasing: the lease agreement and its approval lifecycle.

use crate::model::{
    Cardinality, EntityDefinition, FieldDefinition as F, Operation, OperationKind, Relationship,
    StateMachine,
};
use crate::sample::common::{conditional_list, crud, id, linked, timestamp, transition};
use crate::value::ValueTree;

const SERVICE: &str = "leasing";
const BASE: &str = "/api/leases";

/// Returns the `Lease` entity.
#[must_use]
pub fn lease() -> EntityDefinition {
    EntityDefinition {
        name: "Lease".to_owned(),
        fields: vec![
            F::required("id", id()),
            F::required(
                "lease_number",
                ValueTree::string()
                    .matching(r"^L-[0-9]{6}$")
                    .display()
                    .immutable(),
            ),
            F::required("unit_id", ValueTree::string()),
            F::required(
                "tenant_ids",
                ValueTree::list_of(ValueTree::string()).at_least(1.0),
            ),
            F::required("lease_type", linked("#LeaseType")),
            F::required(
                "status",
                ValueTree::one_of(&[
                    "draft",
                    "pending_approval",
                    "active",
                    "expired",
                    "terminated",
                ])
                .with_default("draft"),
            ),
            F::required("start_date", ValueTree::time()),
            F::optional("end_date", ValueTree::time()),
            F::optional("move_out_date", ValueTree::time()),
            F::required("rent_amount", linked("#PositiveMoney")),
            F::optional("security_deposit", linked("#NonNegativeMoney")),
            F::required(
                "payment_frequency",
                ValueTree::one_of(&["monthly", "weekly", "quarterly"]).with_default("monthly"),
            ),
            F::optional(
                "renewal_term_months",
                ValueTree::int().at_least(1.0).at_most(60.0),
            ),
            F::optional("auto_renew", ValueTree::boolean().with_default(false)),
            F::optional("termination_reason", ValueTree::string().text()),
            F::optional("documents", conditional_list(linked("#Document"))),
            F::optional("signed_at", ValueTree::time()),
            F::optional(
                "legacy_code",
                ValueTree::string().deprecated("replaced by lease_number", Some("2024.1")),
            ),
            F::required("created_at", timestamp()),
            F::required("updated_at", timestamp()),
        ],
    }
}

/// The lease lifecycle.
#[must_use]
pub fn state_machine() -> StateMachine {
    StateMachine::from_pairs(&[
        ("draft", &["pending_approval", "terminated"]),
        ("pending_approval", &["draft", "active", "terminated"]),
        ("active", &["expired", "terminated"]),
        ("expired", &[]),
        ("terminated", &[]),
    ])
}

/// Relationships originating at leases.
#[must_use]
pub fn relationships() -> Vec<Relationship> {
    vec![
        Relationship {
            from: "Lease".to_owned(),
            to: "Unit".to_owned(),
            edge: "unit".to_owned(),
            inverse: "leases".to_owned(),
            cardinality: Cardinality::ManyToOne,
            required: true,
        },
        Relationship {
            from: "Lease".to_owned(),
            to: "Person".to_owned(),
            edge: "tenant".to_owned(),
            inverse: "leases".to_owned(),
            cardinality: Cardinality::ManyToMany,
            required: true,
        },
    ]
}

/// Catalogued operations for leases.
#[must_use]
pub fn operations() -> Vec<Operation> {
    let mut ops = crud(SERVICE, "Lease", BASE);
    ops.extend([
        transition(SERVICE, "Lease", BASE, "submit", "pending_approval", &[]),
        transition(SERVICE, "Lease", BASE, "approve", "active", &["signed_at"]),
        transition(
            SERVICE,
            "Lease",
            BASE,
            "terminate",
            "terminated",
            &["termination_reason"],
        ),
    ]);
    ops.push(Operation {
        service: SERVICE.to_owned(),
        base_path: BASE.to_owned(),
        entity: "Lease".to_owned(),
        kind: OperationKind::Transition,
        path: Some("renew".to_owned()),
        target_state: Some("active".to_owned()),
        required_fields: vec!["renewal_term_months".to_owned()],
        custom: true,
    });
    ops
}
