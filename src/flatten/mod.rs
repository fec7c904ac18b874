//! Object flattening - split nested instance data into per-class tables
//!
//! Every object in a document becomes one row. Nested objects are hoisted
//! into the table named after the key they sit under and replaced in their
//! parent by a reference; sequences stay inline as multi-valued fields.

pub mod extractor;
pub mod types;

pub use extractor::ObjectFlattener;
pub use types::{FieldValue, FlattenConfig, Row, TableCollection, TableName, REF_PREFIX};
