use std::fmt;
use std::path::PathBuf;

/// Kind of schema element involved in a merge conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Class,
    Slot,
    Enum,
    Prefix,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementKind::Class => "class",
            ElementKind::Slot => "slot",
            ElementKind::Enum => "enum",
            ElementKind::Prefix => "prefix",
        };
        f.write_str(s)
    }
}

/// Errors raised while loading instance data or inferring a schema
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported input format `{0}` (expected json, yaml, json.gz or yaml.gz)")]
    UnsupportedFormat(String),

    #[error("malformed document {}: {reason}", .path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("schema merge conflict: {kind} `{name}` is already defined with different content")]
    SchemaMergeConflict { kind: ElementKind, name: String },

    #[error("root class `{0}` was not inferred; the input has no object at its top level")]
    MissingRootClass(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
