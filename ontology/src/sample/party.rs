//! Parties: organizations and the people attached to them.

use crate::model::{Cardinality, EntityDefinition, FieldDefinition as F, Operation, Relationship};
use crate::sample::common::{crud, id, linked, timestamp};
use crate::value::{Kind, ValueTree};

/// Returns the `Organization` entity.
#[must_use]
pub fn organization() -> EntityDefinition {
    EntityDefinition {
        name: "Organization".to_owned(),
        fields: vec![
            F::required("id", id()),
            F::required("name", ValueTree::string().display()),
            F::required(
                "organization_type",
                ValueTree::one_of(&["management_company", "owner_entity", "vendor"]),
            ),
            F::optional(
                "tax_id",
                ValueTree::string().matching(r"^\d{2}-\d{7}$").sensitive(),
            ),
            F::optional("email", ValueTree::string()),
            F::optional("website", ValueTree::string()),
            F::optional("primary_contact", linked("#ContactMethod")),
            F::optional(
                "contact_methods",
                ValueTree::list_of(linked("#ContactMethod")),
            ),
            F::optional("address", linked("#Address")),
            F::required(
                "status",
                ValueTree::one_of(&["active", "inactive"]).with_default("active"),
            ),
            F::required("created_at", timestamp()),
            F::required("updated_at", timestamp()),
        ],
    }
}

/// Returns the `Person` entity.
#[must_use]
pub fn person() -> EntityDefinition {
    EntityDefinition {
        name: "Person".to_owned(),
        fields: vec![
            F::required("id", id()),
            F::required("first_name", ValueTree::string().pii()),
            F::required("last_name", ValueTree::string().pii()),
            F::optional("display_name", ValueTree::string().display().computed()),
            F::optional("email", ValueTree::string().pii()),
            F::optional(
                "phone",
                ValueTree::string().matching(r"^\+?[0-9 ()-]{7,20}$").pii(),
            ),
            F::optional("date_of_birth", ValueTree::time().pii()),
            F::optional(
                "ssn_last_four",
                ValueTree::string().matching(r"^\d{4}$").sensitive().pii(),
            ),
            F::required(
                "role",
                ValueTree::one_of(&["tenant", "owner", "vendor_contact", "staff"]),
            ),
            F::optional("organization_id", ValueTree::string()),
            F::optional(
                "contact_methods",
                ValueTree::list_of(linked("#ContactMethod")),
            ),
            F::optional("tags", ValueTree::list_of(ValueTree::string())),
            F::optional("notes", ValueTree::string().text()),
            F::optional(
                "fax",
                ValueTree::string().deprecated("fax is no longer collected", Some("2023.2")),
            ),
            F::optional("preferences", ValueTree::of(Kind::Struct)),
            F::required("created_at", timestamp()),
            F::required("updated_at", timestamp()),
        ],
    }
}

/// Relationships originating at parties.
#[must_use]
pub fn relationships() -> Vec<Relationship> {
    vec![Relationship {
        from: "Organization".to_owned(),
        to: "Person".to_owned(),
        edge: "members".to_owned(),
        inverse: "organization".to_owned(),
        cardinality: Cardinality::OneToMany,
        required: false,
    }]
}

/// Catalogued operations for parties.
#[must_use]
pub fn operations() -> Vec<Operation> {
    let mut ops = crud("party", "Organization", "/api/organizations");
    ops.extend(crud("party", "Person", "/api/people"));
    ops
}
