//! Maintenance: work orders raised against units.

use crate::model::{
    Cardinality, EntityDefinition, FieldDefinition as F, Operation, Relationship, StateMachine,
};
use crate::sample::common::{conditional_list, crud, id, linked, timestamp, transition};
use crate::value::ValueTree;

const SERVICE: &str = "maintenance";
const BASE: &str = "/api/work-orders";

/// Returns the `WorkOrder` entity.
#[must_use]
pub fn work_order() -> EntityDefinition {
    EntityDefinition {
        name: "WorkOrder".to_owned(),
        fields: vec![
            F::required("id", id()),
            F::required("title", ValueTree::string().display()),
            F::optional("description", ValueTree::string().text()),
            F::required("unit_id", ValueTree::string()),
            F::optional("requester_id", ValueTree::string()),
            F::required(
                "category",
                ValueTree::one_of(&["plumbing", "electrical", "hvac", "appliance", "general"]),
            ),
            F::required(
                "priority",
                ValueTree::any_of(vec![
                    ValueTree::literal("low"),
                    ValueTree::literal("normal").with_default("normal"),
                    ValueTree::literal("high"),
                    ValueTree::literal("emergency"),
                ]),
            ),
            F::required(
                "status",
                ValueTree::one_of(&[
                    "open",
                    "assigned",
                    "in_progress",
                    "on_hold",
                    "completed",
                    "cancelled",
                ])
                .with_default("open"),
            ),
            F::optional("assigned_vendor_id", ValueTree::string()),
            F::optional("estimated_cost", linked("#NonNegativeMoney")),
            F::optional("actual_cost", linked("#NonNegativeMoney")),
            F::optional("scheduled_date", ValueTree::time()),
            F::optional("completed_at", ValueTree::time()),
            F::optional("photos", ValueTree::list_of(linked("#Document"))),
            // Checklist items only exist once the order is scheduled.
            F::optional("checklist", conditional_list(ValueTree::top())),
            F::optional("metadata", ValueTree::top()),
            F::required("created_at", timestamp()),
            F::required("updated_at", timestamp()),
        ],
    }
}

/// The work order lifecycle.
#[must_use]
pub fn state_machine() -> StateMachine {
    StateMachine::from_pairs(&[
        ("open", &["assigned", "cancelled"]),
        ("assigned", &["in_progress", "on_hold", "cancelled"]),
        ("in_progress", &["on_hold", "completed"]),
        ("on_hold", &["in_progress", "cancelled"]),
        ("completed", &[]),
        ("cancelled", &[]),
    ])
}

/// Relationships originating at work orders.
#[must_use]
pub fn relationships() -> Vec<Relationship> {
    vec![
        Relationship {
            from: "WorkOrder".to_owned(),
            to: "Person".to_owned(),
            edge: "requester".to_owned(),
            inverse: "requested_work_orders".to_owned(),
            cardinality: Cardinality::ManyToOne,
            required: false,
        },
        Relationship {
            from: "WorkOrder".to_owned(),
            to: "Organization".to_owned(),
            edge: "assigned_vendor".to_owned(),
            inverse: "assigned_work_orders".to_owned(),
            cardinality: Cardinality::ManyToOne,
            required: false,
        },
    ]
}

/// Catalogued operations for work orders.
#[must_use]
pub fn operations() -> Vec<Operation> {
    let mut ops = crud(SERVICE, "WorkOrder", BASE);
    ops.extend([
        transition(
            SERVICE,
            "WorkOrder",
            BASE,
            "assign",
            "assigned",
            &["assigned_vendor_id"],
        ),
        transition(SERVICE, "WorkOrder", BASE, "start", "in_progress", &[]),
        transition(
            SERVICE,
            "WorkOrder",
            BASE,
            "complete",
            "completed",
            &["completed_at"],
        ),
        transition(SERVICE, "WorkOrder", BASE, "cancel", "cancelled", &[]),
    ]);
    ops
}
