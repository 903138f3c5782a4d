//! Real estate: properties and their rentable units.

use crate::model::{Cardinality, EntityDefinition, FieldDefinition as F, Operation, Relationship};
use crate::sample::common::{crud, id, linked, timestamp};
use crate::value::ValueTree;

/// Returns the `Property` entity.
#[must_use]
pub fn property() -> EntityDefinition {
    EntityDefinition {
        name: "Property".to_owned(),
        fields: vec![
            F::required("id", id()),
            F::required("name", ValueTree::string().display()),
            F::required("property_type", linked("#PropertyType")),
            F::required("address", linked("#Address")),
            // Spelled by edge name: there is no `Owner` entity.
            F::required("owner_id", ValueTree::string()),
            F::optional("manager_id", ValueTree::string()),
            F::optional(
                "year_built",
                ValueTree::all_of(vec![
                    ValueTree::int(),
                    ValueTree::int().at_least(1800.0),
                    ValueTree::int().at_most(2100.0),
                ]),
            ),
            F::optional("unit_count", ValueTree::int().at_least(0.0).computed()),
            F::optional("amenities", ValueTree::list_of(ValueTree::string())),
            F::required(
                "status",
                ValueTree::one_of(&["active", "under_renovation", "inactive"])
                    .with_default("active"),
            ),
            F::optional("description", ValueTree::string().text()),
            F::required("created_at", timestamp()),
            F::required("updated_at", timestamp()),
        ],
    }
}

/// Returns the `Unit` entity.
#[must_use]
pub fn unit() -> EntityDefinition {
    EntityDefinition {
        name: "Unit".to_owned(),
        fields: vec![
            F::required("id", id()),
            F::required("unit_number", ValueTree::string().display()),
            F::required("property_id", ValueTree::string().immutable()),
            F::required(
                "unit_type",
                ValueTree::one_of(&["studio", "apartment", "townhouse", "retail", "office"]),
            ),
            F::optional("bedrooms", ValueTree::int().at_least(0.0).at_most(20.0)),
            F::optional("bathrooms", ValueTree::float().at_least(0.0)),
            F::optional("square_feet", ValueTree::int().greater_than(0.0)),
            F::optional("market_rent", linked("#NonNegativeMoney")),
            F::required(
                "status",
                ValueTree::one_of(&[
                    "vacant",
                    "occupied",
                    "notice_given",
                    "make_ready",
                    "off_market",
                ])
                .with_default("vacant"),
            ),
            F::optional("is_furnished", ValueTree::boolean().with_default(false)),
            F::optional("available_on", ValueTree::time()),
            F::required("created_at", timestamp()),
            F::required("updated_at", timestamp()),
        ],
    }
}

/// Relationships originating at properties and units.
#[must_use]
pub fn relationships() -> Vec<Relationship> {
    vec![
        Relationship {
            from: "Property".to_owned(),
            to: "Organization".to_owned(),
            edge: "owner".to_owned(),
            inverse: "owned_properties".to_owned(),
            cardinality: Cardinality::ManyToOne,
            required: true,
        },
        Relationship {
            from: "Property".to_owned(),
            to: "Person".to_owned(),
            edge: "manager".to_owned(),
            inverse: "managed_properties".to_owned(),
            cardinality: Cardinality::ManyToOne,
            required: false,
        },
        Relationship {
            from: "Property".to_owned(),
            to: "Unit".to_owned(),
            edge: "units".to_owned(),
            inverse: "property".to_owned(),
            cardinality: Cardinality::OneToMany,
            required: false,
        },
        Relationship {
            from: "Unit".to_owned(),
            to: "WorkOrder".to_owned(),
            edge: "work_orders".to_owned(),
            inverse: "unit".to_owned(),
            cardinality: Cardinality::OneToMany,
            required: false,
        },
    ]
}

/// Catalogued operations for properties and units.
#[must_use]
pub fn operations() -> Vec<Operation> {
    let mut ops = crud("property", "Property", "/api/properties");
    ops.extend(crud("property", "Unit", "/api/units"));
    ops
}
