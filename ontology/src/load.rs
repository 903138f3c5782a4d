//! Bundle loading: parse, link named definitions, and check the structural
//! contract the compiler relies on.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::model::Ontology;
use crate::value::{Expression, ValueTree};

/// Maximum depth of definition-to-definition links before the chain is
/// treated as a cycle.
const MAX_LINK_DEPTH: usize = 32;

/// Errors raised while loading an ontology bundle. All are fatal.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The bundle file could not be read.
    #[error("failed to read ontology bundle {path}")]
    Io {
        /// Bundle path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The bundle is not valid JSON of the expected shape.
    #[error("malformed ontology bundle: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two entities share a name.
    #[error("duplicate entity `{0}`")]
    DuplicateEntity(String),
    /// Two distinct entity names map to the same entity id.
    #[error("entities `{first}` and `{second}` both map to id `{id}`")]
    EntityIdCollision {
        /// The shared id.
        id: String,
        /// Entity declared first.
        first: String,
        /// Entity declared later.
        second: String,
    },
    /// An entity declares the same field twice.
    #[error("entity `{entity}` declares field `{field}` more than once")]
    DuplicateField {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
    },
    /// A relationship, state machine, operation, or override names an entity
    /// that is not defined.
    #[error("{context} refers to unknown entity `{entity}`")]
    UnknownEntity {
        /// Where the reference was found.
        context: String,
        /// The missing entity name.
        entity: String,
    },
    /// Named definitions refer to each other in a cycle.
    #[error("named definition `{0}` is part of a reference cycle")]
    ReferenceCycle(String),
}

impl Ontology {
    /// Parses a JSON bundle and prepares it for compilation.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the JSON is malformed or the bundle violates
    /// the structural contract (see [`Ontology::link`]).
    pub fn from_json_str(json: &str) -> Result<Ontology, LoadError> {
        let ontology: Ontology = serde_json::from_str(json)?;
        ontology.link()
    }

    /// Reads and parses a JSON bundle from disk.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read, otherwise as
    /// [`Ontology::from_json_str`].
    pub fn load(path: &Path) -> Result<Ontology, LoadError> {
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ontology = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            entities = ontology.entities.len(),
            fields = ontology.field_count(),
            relationships = ontology.relationships.len(),
            "loaded ontology bundle"
        );
        Ok(ontology)
    }

    /// Validates the bundle and links every reference to its named
    /// definition. After this call the value trees are final.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] on duplicate entities or fields, entity names
    /// that collide once turned into ids, references to unknown entities, or
    /// cyclic named definitions.
    pub fn link(mut self) -> Result<Ontology, LoadError> {
        self.check_names()?;

        let raw = self.definitions.clone();
        let mut linked = BTreeMap::new();
        for (name, def) in &raw {
            linked.insert(name.clone(), link_tree(def.clone(), &raw, 1, name)?);
        }
        for entity in &mut self.entities {
            for field in &mut entity.fields {
                let value = std::mem::replace(&mut field.value, ValueTree::bottom());
                field.value = link_tree(value, &linked, 0, &field.name)?;
            }
        }
        self.definitions = linked;
        Ok(self)
    }

    fn check_names(&self) -> Result<(), LoadError> {
        let mut names = HashSet::new();
        let mut ids: HashMap<String, &str> = HashMap::new();
        for entity in &self.entities {
            if !names.insert(entity.name.as_str()) {
                return Err(LoadError::DuplicateEntity(entity.name.clone()));
            }
            if let Some(first) = ids.insert(entity.id(), &entity.name) {
                return Err(LoadError::EntityIdCollision {
                    id: entity.id(),
                    first: first.to_owned(),
                    second: entity.name.clone(),
                });
            }
            let mut fields = HashSet::new();
            for field in &entity.fields {
                if !fields.insert(field.name.as_str()) {
                    return Err(LoadError::DuplicateField {
                        entity: entity.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }

        let known = |context: String, entity: &str| -> Result<(), LoadError> {
            if names.contains(entity) {
                Ok(())
            } else {
                Err(LoadError::UnknownEntity {
                    context,
                    entity: entity.to_owned(),
                })
            }
        };
        for rel in &self.relationships {
            known(format!("relationship `{}`", rel.edge), &rel.from)?;
            known(format!("relationship `{}`", rel.edge), &rel.to)?;
        }
        for entity in self.state_machines.keys() {
            known("state machine".to_owned(), entity)?;
        }
        for op in &self.operations {
            known(format!("operation of service `{}`", op.service), &op.entity)?;
        }
        for entity in self.overrides.entities.keys() {
            known("display override".to_owned(), entity)?;
        }
        Ok(())
    }
}

/// Links `tree` and everything below it. References to names missing from
/// `defs` are left unlinked: they may name catalogued value types.
fn link_tree(
    mut tree: ValueTree,
    defs: &BTreeMap<String, ValueTree>,
    depth: usize,
    origin: &str,
) -> Result<ValueTree, LoadError> {
    if depth > MAX_LINK_DEPTH {
        return Err(LoadError::ReferenceCycle(origin.to_owned()));
    }
    if let Some(path) = tree.reference.as_deref() {
        match defs.get(path) {
            Some(def) if tree.definition.is_none() => {
                tree.definition = Some(Box::new(link_tree(def.clone(), defs, depth + 1, origin)?));
            }
            Some(_) => {}
            None => debug!(reference = path, origin, "reference left unlinked"),
        }
    }
    tree.expression = match tree.expression {
        Expression::Conjunction(args) => {
            Expression::Conjunction(link_all(args, defs, depth, origin)?)
        }
        Expression::Disjunction(args) => {
            Expression::Disjunction(link_all(args, defs, depth, origin)?)
        }
        Expression::Literal => Expression::Literal,
    };
    if let Some(element) = tree.element.take() {
        tree.element = Some(Box::new(link_tree(*element, defs, depth, origin)?));
    }
    Ok(tree)
}

fn link_all(
    args: Vec<ValueTree>,
    defs: &BTreeMap<String, ValueTree>,
    depth: usize,
    origin: &str,
) -> Result<Vec<ValueTree>, LoadError> {
    args.into_iter()
        .map(|a| link_tree(a, defs, depth, origin))
        .collect()
}
