//! Hand-authored form section templates.
//!
//! Entities listed here get their form laid out section by section; every
//! other entity uses the generic fallback. Template fields that the entity
//! does not have, or that are not UI-eligible, are skipped at assembly.

use crate::document::Condition;

/// A condition over another field, in const-friendly form.
#[derive(Debug, Clone, Copy)]
pub enum When {
    /// `field == value`.
    Equals(&'static str, &'static str),
    /// `field in values`.
    In(&'static str, &'static [&'static str]),
    /// `field` is truthy.
    Truthy(&'static str),
}

impl When {
    /// Builds the document condition.
    #[must_use]
    pub fn condition(self) -> Condition {
        match self {
            When::Equals(field, value) => Condition::equals(field, value),
            When::In(field, values) => Condition::in_set(field, values),
            When::Truthy(field) => Condition::truthy(field),
        }
    }
}

/// One templated form section.
#[derive(Debug, Clone, Copy)]
pub struct SectionTemplate {
    /// Section id.
    pub id: &'static str,
    /// Section title.
    pub title: &'static str,
    /// Field names in order.
    pub fields: &'static [&'static str],
    /// The section can be collapsed.
    pub collapsible: bool,
    /// The section starts collapsed.
    pub collapsed: bool,
    /// Show the section only when this holds.
    pub visible_when: Option<When>,
    /// Require the section's fields only when this holds.
    pub required_when: Option<When>,
}

const fn section(
    id: &'static str,
    title: &'static str,
    fields: &'static [&'static str],
) -> SectionTemplate {
    SectionTemplate {
        id,
        title,
        fields,
        collapsible: false,
        collapsed: false,
        visible_when: None,
        required_when: None,
    }
}

const LEASE: &[SectionTemplate] = &[
    section(
        "lease",
        "Lease",
        &[
            "lease_number",
            "unit_id",
            "tenant_ids",
            "lease_type",
            "status",
        ],
    ),
    section(
        "term",
        "Term",
        &["start_date", "end_date", "payment_frequency", "auto_renew"],
    ),
    SectionTemplate {
        visible_when: Some(When::Truthy("auto_renew")),
        ..section("renewal", "Renewal", &["renewal_term_months"])
    },
    section(
        "financials",
        "Financials",
        &["rent_amount", "security_deposit"],
    ),
    SectionTemplate {
        collapsible: true,
        visible_when: Some(When::Equals("status", "terminated")),
        required_when: Some(When::Equals("status", "terminated")),
        ..section(
            "termination",
            "Termination",
            &["termination_reason", "move_out_date"],
        )
    },
    SectionTemplate {
        collapsible: true,
        collapsed: true,
        ..section("documents", "Documents", &["documents"])
    },
];

const ASSIGNED_ONWARD: &[&str] = &["assigned", "in_progress", "on_hold", "completed"];

const WORK_ORDER: &[SectionTemplate] = &[
    section(
        "request",
        "Request",
        &[
            "title",
            "description",
            "unit_id",
            "requester_id",
            "category",
            "priority",
            "status",
        ],
    ),
    SectionTemplate {
        visible_when: Some(When::In("status", ASSIGNED_ONWARD)),
        ..section(
            "assignment",
            "Assignment",
            &["assigned_vendor_id", "scheduled_date"],
        )
    },
    section("costs", "Costs", &["estimated_cost", "actual_cost"]),
    SectionTemplate {
        visible_when: Some(When::Equals("status", "completed")),
        required_when: Some(When::Equals("status", "completed")),
        ..section("completion", "Completion", &["completed_at"])
    },
    SectionTemplate {
        collapsible: true,
        ..section("attachments", "Attachments", &["photos", "checklist"])
    },
];

/// Returns the section template of an entity, if one exists.
#[must_use]
pub fn form_template(entity: &str) -> Option<&'static [SectionTemplate]> {
    match entity {
        "Lease" => Some(LEASE),
        "WorkOrder" => Some(WORK_ORDER),
        _ => None,
    }
}
