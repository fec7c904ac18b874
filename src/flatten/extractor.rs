use crate::flatten::types::{FieldValue, FlattenConfig, Row, TableCollection, TableName};
use serde_json::{Map, Value};

/// Walks nested JSON and files every object it meets as a row of a table
pub struct ObjectFlattener {
    config: FlattenConfig,
}

impl ObjectFlattener {
    pub fn new(config: FlattenConfig) -> Self {
        ObjectFlattener { config }
    }

    /// Flatten a whole document into a fresh table collection, filing the
    /// top-level object(s) under `container`
    pub fn flatten_document(&self, value: Value, container: &TableName) -> TableCollection {
        let mut tables = TableCollection::new();
        self.flatten(value, container, &mut tables);
        tracing::debug!(
            tables = tables.len(),
            rows = tables.row_count(),
            "flattened document"
        );
        tables
    }

    /// Recursively flatten `value`.
    ///
    /// An object becomes a row of `table` and is replaced by a reference to
    /// it; each of its keys names the table that nested objects under that
    /// key are filed into. Sequences are flattened element-wise under the
    /// same `table`. Scalars pass through unchanged.
    pub fn flatten(&self, value: Value, table: &TableName, tables: &mut TableCollection) -> FieldValue {
        match value {
            Value::Object(obj) => self.flatten_object(obj, table, tables),
            Value::Array(arr) => FieldValue::Sequence(
                arr.into_iter()
                    .map(|item| self.flatten(item, table, tables))
                    .collect(),
            ),
            scalar => FieldValue::Scalar(scalar),
        }
    }

    fn flatten_object(
        &self,
        obj: Map<String, Value>,
        table: &TableName,
        tables: &mut TableCollection,
    ) -> FieldValue {
        let mut row = Row::new();

        for (key, value) in obj.into_iter() {
            if value.is_null() && self.config.omit_null {
                continue;
            }
            let nested_table = TableName::from_key(&key);
            let flattened = self.flatten(value, &nested_table, tables);
            row.insert(key, flattened);
        }

        tracing::trace!(table = %table, fields = row.len(), "row");
        tables.push(table.clone(), row);
        FieldValue::Reference(table.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flatten(input: Value, container: &str, omit_null: bool) -> TableCollection {
        let flattener = ObjectFlattener::new(FlattenConfig { omit_null });
        flattener.flatten_document(input, &TableName::new(container))
    }

    fn count_objects(value: &Value) -> usize {
        match value {
            Value::Object(obj) => 1 + obj.values().map(count_objects).sum::<usize>(),
            Value::Array(arr) => arr.iter().map(count_objects).sum(),
            _ => 0,
        }
    }

    fn collect_references<'a>(value: &'a FieldValue, out: &mut Vec<&'a TableName>) {
        value.for_each_leaf(&mut |leaf| {
            if let Some(table) = leaf.as_reference() {
                out.push(table);
            }
        });
    }

    #[test]
    fn test_flat_object() {
        let tables = flatten(json!({"name": "Alice", "age": 30}), "Person", false);
        assert_eq!(tables.to_json(), json!({"Person": [{"name": "Alice", "age": 30}]}));
    }

    #[test]
    fn test_nested_object() {
        let tables = flatten(json!({"owner": {"name": "Bob"}}), "Container", false);

        assert_eq!(
            tables.to_json(),
            json!({
                "Owner": [{"name": "Bob"}],
                "Container": [{"owner": "$ref:Owner"}]
            })
        );
    }

    #[test]
    fn test_list_of_scalars() {
        let tables = flatten(json!({"tags": ["a", "b"]}), "Container", false);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables.to_json(), json!({"Container": [{"tags": ["a", "b"]}]}));
    }

    #[test]
    fn test_list_of_objects_shares_table() {
        let tables = flatten(
            json!({"gene_list": [{"id": "g1"}, {"id": "g2", "symbol": "BRCA1"}]}),
            "Container",
            false,
        );

        let rows = tables.rows(&TableName::new("GeneList")).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].contains_key("symbol"));
        assert_eq!(
            tables.rows(&TableName::new("Container")).unwrap()[0].to_json(),
            json!({"gene_list": ["$ref:GeneList", "$ref:GeneList"]})
        );
    }

    #[test]
    fn test_top_level_sequence_uses_container() {
        let tables = flatten(json!([{"a": 1}, {"a": 2}]), "Container", false);
        assert_eq!(tables.rows(&TableName::new("Container")).unwrap().len(), 2);
    }

    #[test]
    fn test_colliding_keys_accumulate() {
        let input = json!({
            "item": {"name": "x"},
            "box": {"item": {"weight": 3}}
        });
        let tables = flatten(input, "Container", false);

        let rows = tables.rows(&TableName::new("Item")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].to_json(), json!({"name": "x"}));
        assert_eq!(rows[1].to_json(), json!({"weight": 3}));
    }

    #[test]
    fn test_omit_null() {
        let tables = flatten(json!({"a": null, "b": 1}), "Container", true);
        assert_eq!(tables.to_json(), json!({"Container": [{"b": 1}]}));

        let tables = flatten(json!({"a": null, "b": 1}), "Container", false);
        assert_eq!(tables.to_json(), json!({"Container": [{"a": null, "b": 1}]}));
    }

    #[test]
    fn test_rows_within_table_keep_walk_order() {
        let tables = flatten(
            json!({"people": [{"name": "a"}, {"name": "b"}, {"name": "c"}]}),
            "Container",
            false,
        );
        let names: Vec<Value> = tables
            .rows(&TableName::new("People"))
            .unwrap()
            .iter()
            .map(|row| row.get("name").unwrap().to_json())
            .collect();
        assert_eq!(names, vec![json!("a"), json!("b"), json!("c")]);
    }

    #[test]
    fn test_row_count_and_reference_integrity() {
        let input = json!({
            "id": 1,
            "owner": {"name": "Bob", "address": {"city": "Oslo"}},
            "pets": [
                {"name": "Rex", "toys": [{"kind": "ball"}, {"kind": "rope"}]},
                {"name": "Tom", "toys": []}
            ],
            "matrix": [[{"x": 1}], [{"x": 2}, 3]],
            "empty": {}
        });
        let expected_rows = count_objects(&input);

        let flattener = ObjectFlattener::new(FlattenConfig::default());
        let mut tables = TableCollection::new();
        let root = flattener.flatten(input, &TableName::new("Container"), &mut tables);

        assert_eq!(tables.row_count(), expected_rows);

        let mut refs = Vec::new();
        collect_references(&root, &mut refs);
        for (_, rows) in tables.iter() {
            for row in rows {
                for (_, value) in row.iter() {
                    collect_references(value, &mut refs);
                }
            }
        }
        assert!(!refs.is_empty());
        for table in refs {
            assert!(tables.contains(table), "dangling reference to {}", table);
        }
    }

    #[test]
    fn test_scalar_input_produces_no_tables() {
        let tables = flatten(json!("just a string"), "Container", false);
        assert!(tables.is_empty());
    }
}
