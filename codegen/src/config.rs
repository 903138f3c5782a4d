//! Compiler configuration.

use serde::Deserialize;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML text did not parse into a [`CompilerConfig`].
    #[error("invalid compiler configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Tunables of a compiler run. Every key is optional in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// List column cap, including the trailing "Last Updated" column.
    pub max_list_columns: usize,
    /// Number of fields in the detail overview section.
    pub overview_field_count: usize,
    /// File suffix of entity documents.
    pub document_suffix: String,
    /// File stem of the shared enum catalog. Must sort before every entity
    /// id; staging rejects a stem that does not.
    pub enum_catalog_name: String,
    /// Prefix of conventional base paths for entities absent from the
    /// operation catalog.
    pub api_prefix: String,
    /// Extra definition names treated as catalogued structured types.
    pub structured_types: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_list_columns: 6,
            overview_field_count: 8,
            document_suffix: ".schema.json".to_owned(),
            enum_catalog_name: "_enums".to_owned(),
            api_prefix: "/api".to_owned(),
            structured_types: Vec::new(),
        }
    }
}

impl CompilerConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// File name of an entity's document.
    #[must_use]
    pub fn document_name(&self, entity_id: &str) -> String {
        format!("{entity_id}{}", self.document_suffix)
    }

    /// File name of the shared enum catalog.
    #[must_use]
    pub fn catalog_name(&self) -> String {
        format!("{}{}", self.enum_catalog_name, self.document_suffix)
    }
}
