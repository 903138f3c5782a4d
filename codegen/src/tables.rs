//! Curated lookup tables.
//!
//! Editorial judgment that cannot be derived from the type structure: enum
//! naming, status colors, transition labels and emphasis, and the
//! conditional-constraint table shared by transitions and validation. Every
//! table is append-only; a name missing from a table falls back to a generic
//! derivation.

use crate::document::{ActionVariant, Condition, StatusColor};
use crate::mapping::{humanize, snake_to_pascal};

/// Fields that never appear in forms, detail overviews, or list priority.
pub const SYSTEM_FIELDS: &[&str] = &["id", "created_at", "updated_at", "deleted_at"];

/// Field names whose enum is shared across entities under a canonical id.
pub const CANONICAL_ENUM_FIELDS: &[&str] = &[
    "role",
    "subtype",
    "contact_type",
    "document_type",
    "lease_type",
    "organization_type",
    "property_type",
    "unit_type",
];

const GREEN_STATES: &[&str] = &[
    "active",
    "approved",
    "completed",
    "paid",
    "published",
    "resolved",
    "signed",
];

const RED_STATES: &[&str] = &[
    "cancelled",
    "evicted",
    "failed",
    "rejected",
    "terminated",
    "void",
    "written_off",
];

const YELLOW_STATES: &[&str] = &[
    "expiring_soon",
    "in_review",
    "notice_given",
    "on_hold",
    "past_due",
    "pending",
    "suspended",
];

const DANGER_TARGETS: &[&str] = &[
    "cancelled",
    "deleted",
    "evicted",
    "failed",
    "rejected",
    "terminated",
    "void",
    "written_off",
];

const PRIMARY_TARGETS: &[&str] = &[
    "active",
    "approved",
    "completed",
    "paid",
    "pending_approval",
    "published",
    "renewed",
    "signed",
    "submitted",
];

/// Enum identifier of a field: canonical names are shared, everything else is
/// scoped to the entity (`status` on `Lease` → `LeaseStatus`).
///
/// A scoped id that spells a canonical one (`type` on `Unit` against the
/// shared `UnitType`) takes an `Enum` suffix so the two never merge.
#[must_use]
pub fn enum_identifier(entity: &str, field: &str) -> String {
    if CANONICAL_ENUM_FIELDS.contains(&field) {
        return snake_to_pascal(field);
    }
    let scoped = format!("{entity}{}", snake_to_pascal(field));
    if CANONICAL_ENUM_FIELDS
        .iter()
        .any(|canonical| snake_to_pascal(canonical) == scoped)
    {
        format!("{scoped}Enum")
    } else {
        scoped
    }
}

/// Curated badge color of a state, if any.
#[must_use]
pub fn curated_color(state: &str) -> Option<StatusColor> {
    if GREEN_STATES.contains(&state) {
        Some(StatusColor::Green)
    } else if RED_STATES.contains(&state) {
        Some(StatusColor::Red)
    } else if YELLOW_STATES.contains(&state) {
        Some(StatusColor::Yellow)
    } else {
        None
    }
}

/// States before a record takes effect.
#[must_use]
pub fn is_early_lifecycle(state: &str) -> bool {
    state == "draft" || state == "submitted" || state.starts_with("pending")
}

/// Button label of the `from → to` transition.
#[must_use]
pub fn transition_label(from: &str, to: &str) -> String {
    let label = match to {
        "terminated" if is_early_lifecycle(from) => "Cancel",
        "terminated" => "Terminate",
        "pending_approval" => "Submit for Approval",
        "submitted" => "Submit",
        "active" if from.starts_with("pending") => "Approve",
        "active" if from == "expired" => "Renew",
        "active" if from == "suspended" => "Reactivate",
        "active" => "Activate",
        "approved" => "Approve",
        "rejected" => "Reject",
        "draft" => "Return to Draft",
        "cancelled" => "Cancel",
        "expired" => "Mark Expired",
        "assigned" => "Assign",
        "in_progress" if from == "on_hold" => "Resume",
        "in_progress" => "Start Work",
        "on_hold" => "Put on Hold",
        "completed" => "Complete",
        "closed" => "Close",
        "archived" => "Archive",
        "published" => "Publish",
        "paid" => "Mark Paid",
        "renewed" => "Renew",
        "signed" => "Mark Signed",
        "void" => "Void",
        "written_off" => "Write Off",
        "evicted" => "Evict",
        _ => return format!("Move to {}", humanize(to)),
    };
    label.to_owned()
}

/// Emphasis of a transition, keyed by its target.
#[must_use]
pub fn transition_variant(to: &str) -> ActionVariant {
    if DANGER_TARGETS.contains(&to) {
        ActionVariant::Danger
    } else if PRIMARY_TARGETS.contains(&to) {
        ActionVariant::Primary
    } else {
        ActionVariant::Secondary
    }
}

/// "When `field` is in `values`, `require` must be set."
#[derive(Debug, Clone, Copy)]
pub struct ConditionalConstraint {
    /// Entity name.
    pub entity: &'static str,
    /// Field the condition tests.
    pub field: &'static str,
    /// Values that trigger the requirement.
    pub values: &'static [&'static str],
    /// Fields that become required.
    pub require: &'static [&'static str],
}

impl ConditionalConstraint {
    /// The triggering condition.
    #[must_use]
    pub fn condition(&self) -> Condition {
        match self.values {
            [single] => Condition::equals(self.field, single),
            many => Condition::in_set(self.field, many),
        }
    }
}

const CONDITIONAL_CONSTRAINTS: &[ConditionalConstraint] = &[
    ConditionalConstraint {
        entity: "Lease",
        field: "status",
        values: &["terminated"],
        require: &["termination_reason", "move_out_date"],
    },
    ConditionalConstraint {
        entity: "Lease",
        field: "status",
        values: &["active"],
        require: &["signed_at"],
    },
    ConditionalConstraint {
        entity: "Lease",
        field: "lease_type",
        values: &["fixed_term"],
        require: &["end_date"],
    },
    ConditionalConstraint {
        entity: "WorkOrder",
        field: "status",
        values: &["completed"],
        require: &["completed_at", "actual_cost"],
    },
    ConditionalConstraint {
        entity: "WorkOrder",
        field: "status",
        values: &["assigned", "in_progress"],
        require: &["assigned_vendor_id"],
    },
];

/// Conditional constraints declared for an entity.
pub fn conditional_constraints(
    entity: &str,
) -> impl Iterator<Item = &'static ConditionalConstraint> + '_ {
    CONDITIONAL_CONSTRAINTS
        .iter()
        .filter(move |c| c.entity == entity)
}

/// Fields that entering `state` requires, per the conditional-constraint table.
#[must_use]
pub fn required_on_entering(entity: &str, state: &str) -> Vec<&'static str> {
    conditional_constraints(entity)
        .filter(|c| c.field == "status" && c.values.contains(&state))
        .flat_map(|c| c.require.iter().copied())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn terminate_label_depends_on_source() {
        assert_eq!(transition_label("draft", "terminated"), "Cancel");
        assert_eq!(transition_label("pending_approval", "terminated"), "Cancel");
        assert_eq!(transition_label("active", "terminated"), "Terminate");
        assert_eq!(transition_label("open", "escalated"), "Move to Escalated");
    }

    #[test]
    fn enum_ids() {
        assert_eq!(enum_identifier("Lease", "status"), "LeaseStatus");
        let priority = enum_identifier("WorkOrder", "priority");
        assert_eq!(priority, "WorkOrderPriority");
        assert_eq!(enum_identifier("Person", "role"), "Role");
        assert_eq!(enum_identifier("Unit", "unit_type"), "UnitType");
    }

    #[test]
    fn scoped_ids_never_spell_canonical_ones() {
        assert_eq!(enum_identifier("Unit", "type"), "UnitTypeEnum");
        assert_eq!(enum_identifier("Contact", "type"), "ContactTypeEnum");
        assert_eq!(enum_identifier("Listing", "unit_type"), "UnitType");
        assert_eq!(enum_identifier("Unit", "kind"), "UnitKind");
    }

    #[test]
    fn colors_and_variants() {
        assert_eq!(curated_color("active"), Some(StatusColor::Green));
        assert_eq!(curated_color("terminated"), Some(StatusColor::Red));
        assert_eq!(curated_color("on_hold"), Some(StatusColor::Yellow));
        assert_eq!(curated_color("pending_approval"), None);
        assert_eq!(transition_variant("terminated"), ActionVariant::Danger);
        assert_eq!(transition_variant("active"), ActionVariant::Primary);
        assert_eq!(transition_variant("on_hold"), ActionVariant::Secondary);
    }

    #[test]
    fn constraint_table_lookup() {
        let terminated = required_on_entering("Lease", "terminated");
        assert_eq!(terminated, ["termination_reason", "move_out_date"]);
        let in_progress = required_on_entering("WorkOrder", "in_progress");
        assert_eq!(in_progress, ["assigned_vendor_id"]);
        assert!(required_on_entering("Person", "active").is_empty());
        let last = conditional_constraints("WorkOrder").last().unwrap();
        let condition = last.condition();
        assert!(condition.matches("assigned"));
        assert!(!condition.matches("open"));
    }
}
