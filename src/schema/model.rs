use crate::error::{ElementKind, Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn is_false(b: &bool) -> bool {
    !*b
}

/// A schema: classes with their slots, plus enumerations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub prefixes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_range: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub classes: IndexMap<String, ClassDefinition>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub slots: IndexMap<String, SlotDefinition>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub enums: IndexMap<String, EnumDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    #[serde(skip)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub tree_root: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, SlotDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotDefinition {
    #[serde(skip)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub multivalued: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub identifier: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inlined: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inlined_as_list: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumDefinition {
    #[serde(skip)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permissible_values: IndexMap<String, PermissibleValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissibleValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaDefinition {
    /// Empty schema named `name`, importing the standard linkml types
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut prefixes = IndexMap::new();
        prefixes.insert("linkml".to_string(), "https://w3id.org/linkml/".to_string());
        prefixes.insert(name.clone(), format!("https://w3id.org/{}/", name));

        SchemaDefinition {
            id: format!("https://w3id.org/{}", name),
            default_prefix: Some(name.clone()),
            name,
            description: None,
            prefixes,
            imports: vec!["linkml:types".to_string()],
            default_range: Some("string".to_string()),
            classes: IndexMap::new(),
            slots: IndexMap::new(),
            enums: IndexMap::new(),
        }
    }

    /// Merge `other` into this schema.
    ///
    /// New names are appended in `other`'s order, identical definitions are
    /// skipped, and a same-named element with different content is a
    /// conflict. Schema-level metadata (id, name, imports) of `self` wins.
    pub fn merge(&mut self, other: SchemaDefinition) -> Result<()> {
        merge_into(&mut self.prefixes, other.prefixes, ElementKind::Prefix)?;
        merge_into(&mut self.classes, other.classes, ElementKind::Class)?;
        merge_into(&mut self.slots, other.slots, ElementKind::Slot)?;
        merge_into(&mut self.enums, other.enums, ElementKind::Enum)?;

        for import in other.imports {
            if !self.imports.contains(&import) {
                self.imports.push(import);
            }
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Class flagged as the entry point of the schema, if any
    pub fn tree_root(&self) -> Option<&ClassDefinition> {
        self.classes.values().find(|c| c.tree_root)
    }
}

fn merge_into<V: PartialEq>(
    base: &mut IndexMap<String, V>,
    additions: IndexMap<String, V>,
    kind: ElementKind,
) -> Result<()> {
    for (name, value) in additions {
        match base.get(&name) {
            Some(existing) if *existing == value => {}
            Some(_) => return Err(Error::SchemaMergeConflict { kind, name }),
            None => {
                base.insert(name, value);
            }
        }
    }
    Ok(())
}
