//! Command-line plumbing shared by the `infer-from-*` binaries

use crate::flatten::FlattenConfig;
use crate::schema::{GeneralizerConfig, SchemaDefinition};
use crate::{JsonDataGeneralizer, DEFAULT_CONTAINER_CLASS};
use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Options common to every inference command
#[derive(Args, Debug, Clone)]
pub struct InferenceArgs {
    /// Name of the root class
    #[arg(long, default_value = DEFAULT_CONTAINER_CLASS)]
    pub container_class_name: String,

    /// Name of the output schema (defaults to the root class name)
    #[arg(long)]
    pub schema_name: Option<String>,

    /// Column(s) that are forced to be an enum
    #[arg(long, short = 'E')]
    pub enum_columns: Vec<String>,

    /// Column(s) that are excluded from being enums
    #[arg(long)]
    pub enum_mask_columns: Vec<String>,

    /// Do not create an enum if more than this many distinct members
    #[arg(long, default_value_t = 50)]
    pub max_enum_size: usize,

    /// Do not create an enum if distinct values / total values exceeds this
    #[arg(long, default_value_t = 0.1)]
    pub enum_threshold: f64,

    /// Ignore keys whose value is null
    #[arg(long)]
    pub omit_null: bool,

    /// Write the schema here instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Log progress to stderr (overridden by RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl InferenceArgs {
    pub fn generalizer(&self) -> JsonDataGeneralizer {
        let flatten = FlattenConfig {
            omit_null: self.omit_null,
        };
        let tables = GeneralizerConfig {
            enum_columns: self.enum_columns.clone(),
            enum_mask_columns: self.enum_mask_columns.clone(),
            max_enum_size: self.max_enum_size,
            enum_threshold: self.enum_threshold,
        };

        let mut generalizer = JsonDataGeneralizer::new(flatten, tables)
            .with_container_class_name(self.container_class_name.as_str());
        if let Some(name) = &self.schema_name {
            generalizer = generalizer.with_schema_name(name.as_str());
        }
        generalizer
    }

    /// Serialize the schema as YAML to `--output` or stdout
    pub fn write_schema(&self, schema: &SchemaDefinition) -> Result<()> {
        let yaml = schema.to_yaml().context("Failed to serialize schema")?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, yaml)
                    .with_context(|| format!("Failed to write schema to {}", path.display()))?;
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(yaml.as_bytes()).context("Failed to write schema")?;
                stdout.flush().context("Failed to flush stdout")?;
            }
        }
        Ok(())
    }

    /// Install a stderr subscriber; `RUST_LOG` takes precedence over `-v`
    pub fn init_logging(&self) {
        let default_level = if self.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        inference: InferenceArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::parse_from(["test"]);
        let args = cli.inference;
        assert_eq!(args.container_class_name, "Container");
        assert_eq!(args.max_enum_size, 50);
        assert!((args.enum_threshold - 0.1).abs() < f64::EPSILON);
        assert!(!args.omit_null);
        assert!(args.enum_columns.is_empty());
    }

    #[test]
    fn test_repeated_enum_columns() {
        let cli = TestCli::parse_from([
            "test", "-E", "species", "--enum-columns", "color", "--omit-null",
            "--container-class-name", "Pet",
        ]);
        let args = cli.inference;
        assert_eq!(args.enum_columns, vec!["species", "color"]);
        assert!(args.omit_null);
        assert_eq!(args.generalizer().container_class_name(), "Pet");
    }
}
