//! Schema assembly.
//!
//! Builds one [`SchemaDocument`] per entity from the resolved model, plus the
//! shared [`EnumCatalog`].

pub mod api;
pub mod detail;
pub mod enums;
pub mod form;
pub mod list;
pub mod status;
pub mod validation;

use std::collections::BTreeMap;

use ui_ontology::{Operation, Relationship};

use crate::config::CompilerConfig;
use crate::document::{
    Direction, DisplayMeta, EnumCatalog, FieldDescriptor, FieldType, RelationshipDescriptor,
    SchemaDocument,
};
use crate::loader::{CompiledEntity, CompiledModel};
use crate::mapping::{humanize, pluralize, to_snake_case};
use crate::tables::{self, SYSTEM_FIELDS};

/// Fields a person fills in: not computed, not deprecated, not a system field.
#[must_use]
pub fn is_ui_eligible(f: &FieldDescriptor) -> bool {
    !f.computed && f.deprecated.is_none() && !SYSTEM_FIELDS.contains(&f.name.as_str())
}

/// Every assembled document, keyed by entity id, and the enum catalog.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Entity id → document.
    pub documents: BTreeMap<String, SchemaDocument>,
    /// The shared enum catalog.
    pub catalog: EnumCatalog,
}

fn display_meta(model: &CompiledModel, entity: &CompiledEntity) -> DisplayMeta {
    let curated = model.overrides.entities.get(entity.name());
    let name = curated
        .and_then(|o| o.display_name.clone())
        .unwrap_or_else(|| humanize(entity.name()));
    let plural = curated
        .and_then(|o| o.plural.clone())
        .unwrap_or_else(|| pluralize(&name));
    let primary_display = curated
        .and_then(|o| o.primary_display.clone())
        .unwrap_or_else(|| {
            let field = entity
                .fields
                .iter()
                .find(|f| f.display)
                .or_else(|| entity.field("name"))
                .or_else(|| entity.field("title"))
                .map_or("id", |f| f.name.as_str());
            format!("{{{field}}}")
        });
    DisplayMeta {
        name,
        plural,
        primary_display,
    }
}

fn relationships_of(entity: &str, relationships: &[Relationship]) -> Vec<RelationshipDescriptor> {
    let mut out = Vec::new();
    for rel in relationships {
        if rel.from == entity {
            out.push(RelationshipDescriptor {
                name: rel.edge.clone(),
                target: to_snake_case(&rel.to),
                inverse: rel.inverse.clone(),
                cardinality: rel.cardinality.as_str().to_owned(),
                required: rel.required,
                direction: Direction::Outgoing,
            });
        }
        if rel.to == entity {
            out.push(RelationshipDescriptor {
                name: rel.inverse.clone(),
                target: to_snake_case(&rel.from),
                inverse: rel.edge.clone(),
                cardinality: rel.cardinality.inverse().as_str().to_owned(),
                required: false,
                direction: Direction::Incoming,
            });
        }
    }
    out
}

/// Returns the entity's descriptors with enum identifiers filled in.
fn with_enum_refs(entity: &CompiledEntity) -> Vec<FieldDescriptor> {
    entity
        .fields
        .iter()
        .cloned()
        .map(|mut f| {
            if f.field_type == FieldType::Enum {
                f.enum_ref = Some(tables::enum_identifier(entity.name(), &f.name));
            }
            f
        })
        .collect()
}

fn assemble_entity(
    model: &CompiledModel,
    entity: &CompiledEntity,
    catalog: &EnumCatalog,
    config: &CompilerConfig,
) -> SchemaDocument {
    let name = entity.name();
    let fields = with_enum_refs(entity);
    let display = display_meta(model, entity);
    let operations: Vec<&Operation> = model
        .operations
        .iter()
        .filter(|op| op.entity == name)
        .collect();
    let api = api::build_api(&operations, &config.api_prefix, &entity.id);
    let overview = config.overview_field_count;

    let enums = fields
        .iter()
        .filter_map(|f| f.enum_ref.as_ref())
        .filter_map(|id| catalog.enums.get(id).map(|e| (id.clone(), e.clone())))
        .collect();

    let status_field = fields
        .iter()
        .find(|f| f.name == "status" && f.field_type == FieldType::Enum);
    let (status, state_machine) = match model.state_graphs.get(name) {
        Some(graph) => {
            let ctx = status::TransitionContext {
                entity: name,
                display_name: &display.name,
                base_path: &api.base_path,
                operations: &operations,
            };
            (
                Some(status::build_status(graph, status_field)),
                Some(status::build_state_machine(&ctx, graph, status_field)),
            )
        }
        None => (None, None),
    };

    SchemaDocument {
        entity: entity.id.clone(),
        name: name.to_owned(),
        form: form::build_form(name, &fields),
        detail: detail::build_detail(name, &fields, &model.relationships, overview),
        list: list::build_list(&fields, config.max_list_columns),
        validation: validation::build_validation(name, &fields),
        relationships: relationships_of(name, &model.relationships),
        display,
        enums,
        status,
        state_machine,
        api,
        fields,
    }
}

/// Assembles every document and the enum catalog.
#[must_use]
pub fn assemble(model: &CompiledModel, config: &CompilerConfig) -> Assembly {
    let catalog = EnumCatalog {
        version: model.version.clone(),
        enums: enums::build_catalog(model),
    };
    let documents = model
        .entities
        .iter()
        .map(|entity| {
            let document = assemble_entity(model, entity, &catalog, config);
            (entity.id.clone(), document)
        })
        .collect();
    Assembly { documents, catalog }
}
