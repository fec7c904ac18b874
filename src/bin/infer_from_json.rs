//! infer-from-json: Infer a schema from JSON or YAML instance data
//!
//! Usage:
//!   # Infer from a JSON document, print YAML schema to stdout
//!   infer-from-json data.json
//!
//!   # Gzipped YAML, with a named root class
//!   infer-from-json -f yaml.gz dump.yaml.gz --container-class-name Dataset
//!
//!   # Force an enum and skip nulls
//!   infer-from-json data.json -E status --omit-null -o schema.yaml

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use caster::cli::InferenceArgs;
use caster::InputFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "infer-from-json")]
#[command(about = "Infer a schema from JSON or YAML instance data", long_about = None)]
struct Args {
    /// Input file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// json or yaml (or json.gz or yaml.gz)
    #[arg(long, short = 'f', default_value = "json")]
    format: String,

    #[command(flatten)]
    inference: InferenceArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.inference.init_logging();

    let format: InputFormat = args.format.parse()?;
    let schema = args
        .inference
        .generalizer()
        .convert_path(&args.input, format)
        .with_context(|| format!("Failed to infer schema from {}", args.input.display()))?;

    args.inference.write_schema(&schema)
}
