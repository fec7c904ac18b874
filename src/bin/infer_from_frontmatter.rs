//! infer-from-frontmatter: Infer a schema from frontmatter documents
//!
//! Every input is a text file with a YAML block between `---` lines; the
//! text after the block is stored in a text slot. All documents become
//! instances collected under the root class's `objects` slot.
//!
//! Usage:
//!   infer-from-frontmatter notes/*.md --container-class-name Notebook

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use caster::cli::InferenceArgs;
use caster::frontmatter::DEFAULT_TEXT_FIELD;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "infer-from-frontmatter")]
#[command(about = "Infer a schema from frontmatter documents", long_about = None)]
struct Args {
    /// Frontmatter documents
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Slot receiving the text that follows the metadata block
    #[arg(long, default_value = DEFAULT_TEXT_FIELD)]
    text_field: String,

    #[command(flatten)]
    inference: InferenceArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.inference.init_logging();

    let schema = args
        .inference
        .generalizer()
        .convert_frontmatter(&args.inputs, &args.text_field)
        .context("Failed to infer schema from frontmatter documents")?;

    args.inference.write_schema(&schema)
}
