use crate::error::{Error, Result};
use crate::flatten::{TableCollection, TableName};
use crate::schema::model::SchemaDefinition;
use crate::schema::tabular::TableGeneralizer;

/// Generalize every table and merge the partial schemas into one.
///
/// Tables are visited in collection order. The class for `container` is
/// flagged as the tree root. Any naming conflict between partial schemas
/// aborts assembly.
pub fn assemble<G: TableGeneralizer + ?Sized>(
    generalizer: &G,
    tables: &TableCollection,
    container: &TableName,
    schema_name: &str,
) -> Result<SchemaDefinition> {
    let mut schema = SchemaDefinition::new(schema_name);

    for (table, rows) in tables.iter() {
        let partial = generalizer.convert_rows(rows, table.as_str(), table.as_str())?;
        tracing::debug!(table = %table, classes = partial.classes.len(), "merging partial schema");
        schema.merge(partial)?;
    }

    match schema.classes.get_mut(container.as_str()) {
        Some(class) => class.tree_root = true,
        None => return Err(Error::MissingRootClass(container.to_string())),
    }

    Ok(schema)
}
