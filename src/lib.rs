//! # Caster - schema inference from instance data
//!
//! Infers class/slot schemas from semi-structured data: JSON, YAML and
//! frontmatter-tagged text files.
//!
//! ## Modules
//!
//! - **flatten**: split nested objects into per-class tables of rows
//! - **schema**: generalize each table into a class and merge the results
//! - **frontmatter**: read documents made of a YAML block plus free text
//! - **input**: load JSON / YAML documents, optionally gzipped
//!
//! ## Quick Start
//!
//! ```rust
//! use caster::JsonDataGeneralizer;
//! use serde_json::json;
//!
//! # fn main() -> caster::Result<()> {
//! let data = json!({
//!     "name": "Alice",
//!     "owner": {"name": "Bob"},
//!     "tags": ["a", "b"]
//! });
//!
//! let schema = JsonDataGeneralizer::default().convert(data)?;
//!
//! // classes: Owner, Container (tree root)
//! assert!(schema.classes["Container"].tree_root);
//! # Ok(())
//! # }
//! ```
//!
//! Class names follow the keys nested objects are found under: the object
//! at `owner` becomes class `Owner`. Objects under keys that canonicalize to
//! the same name share one class.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub mod cli;
pub mod error;
pub mod flatten;
pub mod frontmatter;
pub mod input;
pub mod schema;

// Re-export commonly used types for convenience
pub use error::{ElementKind, Error, Result};
pub use flatten::{FieldValue, FlattenConfig, ObjectFlattener, Row, TableCollection, TableName};
pub use input::InputFormat;
pub use schema::{assemble, GeneralizerConfig, RowGeneralizer, SchemaDefinition, TableGeneralizer};

/// Default name of the class holding the top-level object
pub const DEFAULT_CONTAINER_CLASS: &str = "Container";

/// Key under which frontmatter documents are collected before inference
pub const FRONTMATTER_COLLECTION_KEY: &str = "objects";

/// Main entry point: infer a schema from instance data
#[derive(Debug, Clone)]
pub struct JsonDataGeneralizer {
    container_class_name: String,
    schema_name: Option<String>,
    flatten: FlattenConfig,
    generalizer: RowGeneralizer,
}

impl Default for JsonDataGeneralizer {
    fn default() -> Self {
        JsonDataGeneralizer {
            container_class_name: DEFAULT_CONTAINER_CLASS.to_string(),
            schema_name: None,
            flatten: FlattenConfig::default(),
            generalizer: RowGeneralizer::default(),
        }
    }
}

impl JsonDataGeneralizer {
    pub fn new(flatten: FlattenConfig, generalizer: GeneralizerConfig) -> Self {
        JsonDataGeneralizer {
            flatten,
            generalizer: RowGeneralizer::new(generalizer),
            ..Default::default()
        }
    }

    /// Name of the class the top-level object is filed under
    pub fn with_container_class_name(mut self, name: impl Into<String>) -> Self {
        self.container_class_name = name.into();
        self
    }

    /// Name of the output schema; defaults to the container class name
    pub fn with_schema_name(mut self, name: impl Into<String>) -> Self {
        self.schema_name = Some(name.into());
        self
    }

    pub fn container_class_name(&self) -> &str {
        &self.container_class_name
    }

    /// Flatten a value into tables without generalizing them
    pub fn flatten(&self, value: Value) -> TableCollection {
        let container = TableName::new(self.container_class_name.as_str());
        ObjectFlattener::new(self.flatten.clone()).flatten_document(value, &container)
    }

    /// Infer a schema from an already-loaded value
    pub fn convert(&self, value: Value) -> Result<SchemaDefinition> {
        let container = TableName::new(self.container_class_name.as_str());
        let tables = self.flatten(value);
        let schema_name = self.schema_name.as_deref().unwrap_or(&self.container_class_name);
        assemble(&self.generalizer, &tables, &container, schema_name)
    }

    /// Load a JSON or YAML document from disk and infer a schema from it
    pub fn convert_path(&self, path: impl AsRef<Path>, format: InputFormat) -> Result<SchemaDefinition> {
        let value = input::load_path(path, format)?;
        self.convert(value)
    }

    /// Infer a schema from frontmatter documents. The parsed documents are
    /// collected under an `objects` key of the container object.
    pub fn convert_frontmatter(&self, paths: &[PathBuf], text_field: &str) -> Result<SchemaDefinition> {
        let documents = frontmatter::parse_files(paths, text_field)?;
        tracing::debug!(documents = documents.len(), "parsed frontmatter documents");
        let mut container = Map::new();
        container.insert(FRONTMATTER_COLLECTION_KEY.to_string(), Value::Array(documents));
        self.convert(Value::Object(container))
    }
}
