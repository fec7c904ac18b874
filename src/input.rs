//! Loading instance data from JSON or YAML files, optionally gzipped

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Serialization of an input document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Json,
    Yaml,
}

/// Input format as given on the command line: `json`, `yaml`, `json.gz`
/// or `yaml.gz`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputFormat {
    pub syntax: Syntax,
    pub gzipped: bool,
}

impl InputFormat {
    pub const JSON: InputFormat = InputFormat { syntax: Syntax::Json, gzipped: false };
    pub const YAML: InputFormat = InputFormat { syntax: Syntax::Yaml, gzipped: false };
}

impl Default for InputFormat {
    fn default() -> Self {
        InputFormat::JSON
    }
}

impl FromStr for InputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (base, gzipped) = match s.strip_suffix(".gz") {
            Some(base) => (base, true),
            None => (s, false),
        };

        let syntax = match base {
            "json" => Syntax::Json,
            "yaml" | "yml" => Syntax::Yaml,
            _ => return Err(Error::UnsupportedFormat(s.to_string())),
        };

        Ok(InputFormat { syntax, gzipped })
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.syntax {
            Syntax::Json => "json",
            Syntax::Yaml => "yaml",
        };
        if self.gzipped {
            write!(f, "{}.gz", base)
        } else {
            f.write_str(base)
        }
    }
}

/// Load a whole document into memory. The file is closed before returning.
///
/// JSON goes through the SIMD parser first. It parses in place, so on
/// failure the buffer is dropped and the file is re-read with serde_json,
/// which also gives the better error message on malformed input.
pub fn load_path(path: impl AsRef<Path>, format: InputFormat) -> Result<Value> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), format = %format, "loading input");

    match format.syntax {
        Syntax::Yaml => load_reader(open(path, format.gzipped)?, Syntax::Yaml),
        Syntax::Json => {
            let mut content = Vec::new();
            open(path, format.gzipped)?.read_to_end(&mut content)?;

            match simd_json::serde::from_slice::<Value>(&mut content) {
                Ok(value) => Ok(value),
                Err(err) => {
                    tracing::debug!(error = %err, "SIMD parse failed, retrying with serde_json");
                    drop(content);
                    load_reader(open(path, format.gzipped)?, Syntax::Json)
                }
            }
        }
    }
}

/// Load a document from an already-decompressed stream
pub fn load_reader<R: Read>(reader: R, syntax: Syntax) -> Result<Value> {
    match syntax {
        Syntax::Json => Ok(serde_json::from_reader(reader)?),
        Syntax::Yaml => Ok(serde_yaml::from_reader(reader)?),
    }
}

fn open(path: &Path, gzipped: bool) -> Result<Box<dyn Read>> {
    let file = BufReader::new(File::open(path)?);
    if gzipped {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}
