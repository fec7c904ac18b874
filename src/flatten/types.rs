use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;

/// Prefix used when a reference is rendered as a plain string
pub const REF_PREFIX: &str = "$ref:";

static WORD_BOUNDARY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\W_]+").unwrap());

/// Name of an inferred table, which doubles as the inferred class name.
///
/// Table names come from the *key* a nested object was found under, not
/// from the object's shape: `{"owner": {...}}` files its content under
/// `Owner`, and renaming the key renames the class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableName(String);

impl TableName {
    /// Use `name` verbatim, e.g. for the container class
    pub fn new(name: impl Into<String>) -> Self {
        TableName(name.into())
    }

    /// Canonicalize a key into a class-style name: `gene_list` -> `GeneList`.
    ///
    /// Words are split on underscores and non-word characters; each word
    /// has its first character upper-cased and the rest kept as-is. A key
    /// with no word characters at all is used unchanged.
    pub fn from_key(key: &str) -> Self {
        let name: String = WORD_BOUNDARY_REGEX
            .split(key)
            .filter(|word| !word.is_empty())
            .map(upper_first)
            .collect();

        if name.is_empty() {
            TableName(key.to_string())
        } else {
            TableName(name)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A value stored in a flattened row
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A JSON scalar (string, number, bool or null), passed through unchanged
    Scalar(Value),

    /// A nested object hoisted into the named table
    Reference(TableName),

    /// A sequence of flattened values
    Sequence(Vec<FieldValue>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Scalar(Value::Null))
    }

    pub fn as_reference(&self) -> Option<&TableName> {
        match self {
            FieldValue::Reference(table) => Some(table),
            _ => None,
        }
    }

    /// Render as JSON, with references written as `$ref:<Table>` strings
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Scalar(v) => v.clone(),
            FieldValue::Reference(table) => Value::String(format!("{}{}", REF_PREFIX, table)),
            FieldValue::Sequence(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
        }
    }

    /// Visit every non-sequence value, descending into nested sequences
    pub fn for_each_leaf<'a>(&'a self, f: &mut impl FnMut(&'a FieldValue)) {
        match self {
            FieldValue::Sequence(items) => {
                for item in items {
                    item.for_each_leaf(f);
                }
            }
            leaf => f(leaf),
        }
    }
}

/// One flattened object - a row in its table. Field order follows the
/// key order of the source object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: IndexMap<String, FieldValue>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    pub fn insert(&mut self, key: String, value: FieldValue) {
        self.fields.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

/// Rows grouped by table, in the order tables received their first row
#[derive(Debug, Clone, Default)]
pub struct TableCollection {
    tables: IndexMap<TableName, Vec<Row>>,
}

impl TableCollection {
    pub fn new() -> Self {
        TableCollection::default()
    }

    pub fn push(&mut self, table: TableName, row: Row) {
        self.tables.entry(table).or_default().push(row);
    }

    pub fn rows(&self, table: &TableName) -> Option<&[Row]> {
        self.tables.get(table).map(Vec::as_slice)
    }

    pub fn contains(&self, table: &TableName) -> bool {
        self.tables.contains_key(table)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &TableName> {
        self.tables.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TableName, &[Row])> {
        self.tables.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    /// JSON view of the collection: `{"Table": [row, ...], ...}`
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .tables
            .iter()
            .map(|(name, rows)| {
                let rows = rows.iter().map(Row::to_json).collect();
                (name.to_string(), Value::Array(rows))
            })
            .collect();
        Value::Object(map)
    }
}

/// Configuration for the flattening walk
#[derive(Debug, Clone, Default)]
pub struct FlattenConfig {
    /// Drop key/value pairs whose value is null instead of recording them
    pub omit_null: bool,
}
