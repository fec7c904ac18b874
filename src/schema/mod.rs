//! Schema inference from flattened tables
//!
//! Each table is generalized into a partial schema holding one class, and
//! the partial schemas are merged into the final schema.

pub mod assembler;
pub mod model;
pub mod tabular;

pub use assembler::assemble;
pub use model::{ClassDefinition, EnumDefinition, PermissibleValue, SchemaDefinition, SlotDefinition};
pub use tabular::{GeneralizerConfig, Range, RowGeneralizer, TableGeneralizer};
