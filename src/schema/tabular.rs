//! Tabular generalization - infer one class from a table of flattened rows
//!
//! Statistics are accumulated column by column in a single pass over the
//! rows, and slot definitions are built once at the end.

use crate::error::Result;
use crate::flatten::{FieldValue, Row, TableName};
use crate::schema::model::{ClassDefinition, EnumDefinition, PermissibleValue, SchemaDefinition, SlotDefinition};
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static ISO_DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?$").unwrap()
});

static ISO_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap()
});

static MEASUREMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?\d+(\.\d+)?\s*[a-zA-Zµ]+$").unwrap()
});

/// Turns the rows of one table into a partial schema holding one class
pub trait TableGeneralizer {
    fn convert_rows(&self, rows: &[Row], class_name: &str, group_label: &str) -> Result<SchemaDefinition>;
}

/// Thresholds for enumeration detection
#[derive(Debug, Clone)]
pub struct GeneralizerConfig {
    /// Columns always turned into enums
    pub enum_columns: Vec<String>,

    /// Columns never turned into enums
    pub enum_mask_columns: Vec<String>,

    /// Do not create an enum with more than this many distinct members
    pub max_enum_size: usize,

    /// Do not create an enum when distinct values / total values exceeds this
    pub enum_threshold: f64,
}

impl Default for GeneralizerConfig {
    fn default() -> Self {
        GeneralizerConfig {
            enum_columns: vec![],
            enum_mask_columns: vec![],
            max_enum_size: 50,
            enum_threshold: 0.1,
        }
    }
}

/// Inferred range of a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Range {
    Class(TableName),
    Integer,
    Float,
    Boolean,
    Measurement,
    Datetime,
    Date,
    Uri,
    String,
}

impl Range {
    pub fn as_str(&self) -> &str {
        match self {
            Range::Class(table) => table.as_str(),
            Range::Integer => "integer",
            Range::Float => "float",
            Range::Boolean => "boolean",
            Range::Measurement => "measurement",
            Range::Datetime => "datetime",
            Range::Date => "date",
            Range::Uri => "uri",
            Range::String => "string",
        }
    }
}

/// Statistics gathered for one column
#[derive(Debug, Default)]
struct ColumnStats<'a> {
    /// Rows in which the column holds a non-null value
    filled_rows: usize,
    multivalued: bool,
    /// Non-null, non-empty leaf values in row order
    values: Vec<&'a FieldValue>,
}

impl<'a> ColumnStats<'a> {
    fn add(&mut self, value: &'a FieldValue) {
        if value.is_null() {
            return;
        }
        self.filled_rows += 1;
        if matches!(value, FieldValue::Sequence(_)) {
            self.multivalued = true;
        }
        let values = &mut self.values;
        value.for_each_leaf(&mut |leaf| {
            if !is_blank(leaf) {
                values.push(leaf);
            }
        });
    }

    fn distinct_texts(&self) -> IndexSet<String> {
        self.values.iter().filter_map(|v| scalar_text(v)).collect()
    }
}

/// Default generalizer: type, cardinality and enum inference over rows
#[derive(Debug, Clone, Default)]
pub struct RowGeneralizer {
    config: GeneralizerConfig,
}

impl RowGeneralizer {
    pub fn new(config: GeneralizerConfig) -> Self {
        RowGeneralizer { config }
    }

    fn build_slot(
        &self,
        class_name: &str,
        column: &str,
        stats: &ColumnStats<'_>,
        row_count: usize,
        enums: &mut IndexMap<String, EnumDefinition>,
    ) -> SlotDefinition {
        let range = infer_range(column, &stats.values);
        let required = stats.filled_rows == row_count;

        let mut slot = SlotDefinition {
            name: column.to_string(),
            multivalued: stats.multivalued,
            required,
            ..Default::default()
        };

        if let Range::Class(_) = range {
            slot.inlined = true;
            slot.inlined_as_list = stats.multivalued;
        }

        if column == "id" && required && !stats.multivalued && !matches!(range, Range::Class(_)) {
            slot.identifier = stats.values.len() == stats.filled_rows
                && stats.distinct_texts().len() == stats.values.len();
        }

        let mut range_name = range.as_str().to_string();
        if range == Range::String {
            if let Some(enum_def) = self.infer_enum(class_name, column, stats) {
                range_name = enum_def.name.clone();
                enums.insert(enum_def.name.clone(), enum_def);
            }
        }
        slot.range = Some(range_name);
        slot
    }

    /// Enum names are scoped by class, so equally named columns of
    /// different classes never share an enum
    fn infer_enum(&self, class_name: &str, column: &str, stats: &ColumnStats<'_>) -> Option<EnumDefinition> {
        let distinct = stats.distinct_texts();
        if distinct.is_empty() {
            return None;
        }

        let forced = self.config.enum_columns.iter().any(|c| c == column);
        if !forced {
            if self.config.enum_mask_columns.iter().any(|c| c == column) {
                return None;
            }
            if distinct.len() > self.config.max_enum_size {
                return None;
            }
            let ratio = distinct.len() as f64 / stats.values.len() as f64;
            if ratio > self.config.enum_threshold {
                return None;
            }
        }

        let name = format!("{}_{}_enum", class_name, column);
        tracing::debug!(column, enum_name = %name, members = distinct.len(), forced, "inferred enum");
        Some(EnumDefinition {
            name,
            description: None,
            permissible_values: distinct
                .into_iter()
                .map(|text| (text, PermissibleValue::default()))
                .collect(),
        })
    }
}

impl TableGeneralizer for RowGeneralizer {
    fn convert_rows(&self, rows: &[Row], class_name: &str, group_label: &str) -> Result<SchemaDefinition> {
        let mut columns: IndexMap<&str, ColumnStats<'_>> = IndexMap::new();
        for row in rows {
            for (key, value) in row.iter() {
                columns.entry(key.as_str()).or_default().add(value);
            }
        }

        let mut enums = IndexMap::new();
        let mut class = ClassDefinition {
            name: class_name.to_string(),
            ..Default::default()
        };
        for (column, stats) in &columns {
            let slot = self.build_slot(class_name, column, stats, rows.len(), &mut enums);
            class.attributes.insert(column.to_string(), slot);
        }

        tracing::debug!(
            class = class_name,
            rows = rows.len(),
            slots = class.attributes.len(),
            enums = enums.len(),
            "generalized table"
        );

        let mut schema = SchemaDefinition::new(group_label);
        schema.classes.insert(class_name.to_string(), class);
        schema.enums = enums;
        Ok(schema)
    }
}

/// Infer the range of a column from its non-null leaf values
pub fn infer_range(column: &str, values: &[&FieldValue]) -> Range {
    if values.is_empty() {
        return Range::String;
    }

    let references: IndexSet<&TableName> = values.iter().filter_map(|v| v.as_reference()).collect();
    if !references.is_empty() {
        let all_refs = references.len() == 1 && values.iter().all(|v| v.as_reference().is_some());
        if all_refs {
            if let Some(table) = references.into_iter().next() {
                return Range::Class(table.clone());
            }
        }
        tracing::warn!(column, "column mixes nested objects with other values; typing it as string");
        return Range::String;
    }

    let scalars: Vec<&Value> = values
        .iter()
        .filter_map(|v| match v {
            FieldValue::Scalar(s) => Some(s),
            _ => None,
        })
        .collect();

    if scalars.iter().all(|v| is_integer(v)) {
        Range::Integer
    } else if scalars.iter().all(|v| is_float(v)) {
        Range::Float
    } else if scalars.iter().all(|v| is_boolean(v)) {
        Range::Boolean
    } else if all_strings_match(&scalars, |s| MEASUREMENT_REGEX.is_match(s)) {
        Range::Measurement
    } else if all_strings_match(&scalars, |s| ISO_DATETIME_REGEX.is_match(s)) {
        Range::Datetime
    } else if all_strings_match(&scalars, |s| ISO_DATE_REGEX.is_match(s)) {
        Range::Date
    } else if all_strings_match(&scalars, is_uri) {
        Range::Uri
    } else {
        Range::String
    }
}

fn is_blank(value: &FieldValue) -> bool {
    match value {
        FieldValue::Scalar(Value::Null) => true,
        FieldValue::Scalar(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

fn scalar_text(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Scalar(Value::String(s)) => Some(s.clone()),
        FieldValue::Scalar(other) => Some(other.to_string()),
        _ => None,
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}

fn is_float(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => s.trim().parse::<f64>().map(f64::is_finite).unwrap_or(false),
        _ => false,
    }
}

fn is_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "false"),
        _ => false,
    }
}

fn is_uri(s: &str) -> bool {
    s.len() > 6
        && (s.starts_with("http://")
            || s.starts_with("https://")
            || s.starts_with("ftp://")
            || s.starts_with("file://"))
}

fn all_strings_match(values: &[&Value], pred: impl Fn(&str) -> bool) -> bool {
    values.iter().all(|v| match v {
        Value::String(s) => pred(s.trim()),
        _ => false,
    })
}
