mod generate;
mod generators;
mod project;
mod schema;
mod validate;

pub(crate) use generate::GenerateJsonOutput;
pub(crate) use generators::GeneratorsJsonOutput;
pub(crate) use project::ProjectJsonOutput;
pub(crate) use validate::ValidateJsonOutput;

use anyhow::Context;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use mock_synth::SchemaNode;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mock-synth")]
#[command(version)]
#[command(about = "Generate deterministic, relationship-aware mock data from schemas", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate mock records for a single schema
    Generate {
        /// Schema file (JSON, or YAML with .yaml/.yml extension)
        schema: PathBuf,

        /// Records to generate before relationship scaling
        #[arg(short = 'n', long, default_value = "5")]
        count: usize,

        /// Base seed for reproducible output (random if not specified)
        #[arg(long)]
        seed: Option<u64>,

        /// File mapping endpoint ids to existing record ids, for relationships
        #[arg(long)]
        parents: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the full batch (seed, scaling, parent traces) instead of bare records
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Generate every endpoint of a project file in dependency order
    Project {
        /// Project file (YAML or JSON)
        config: PathBuf,

        /// Output directory, one <endpoint>.json per endpoint
        #[arg(short, long, default_value = "mock-data")]
        output: PathBuf,

        /// Show progress during generation
        #[arg(short, long)]
        progress: bool,

        /// Output a run summary as JSON
        #[arg(long)]
        json: bool,

        /// Generate without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Check a schema and list its relationship fields
    Validate {
        /// Schema file (JSON, or YAML with .yaml/.yml extension)
        schema: PathBuf,

        /// Output results as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// List the available content generators
    Generators {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the JSON Schema that records generated from a schema conform to
    Schema {
        /// Schema file to export
        #[arg(required_unless_present = "output_types")]
        schema: Option<PathBuf>,

        /// Print the JSON Schemas of this tool's --json output instead
        #[arg(long, conflicts_with = "schema")]
        output_types: bool,

        /// With --output-types, only print the schema for this command
        #[arg(long, requires = "output_types")]
        command: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            schema,
            count,
            seed,
            parents,
            output,
            json,
            pretty,
        } => generate::run(schema, count, seed, parents, output, json, pretty, cli.quiet),
        Commands::Project {
            config,
            output,
            progress,
            json,
            dry_run,
        } => project::run(config, output, progress, json, dry_run),
        Commands::Validate { schema, json } => validate::run(schema, json),
        Commands::Generators { json } => generators::run(json),
        Commands::Schema {
            schema,
            output_types,
            command,
            output,
        } => schema::run(schema, output_types, command, output),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "mock-synth", &mut io::stdout());
            Ok(())
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Read and parse a schema file.
pub(crate) fn read_schema(path: &Path) -> anyhow::Result<SchemaNode> {
    if !path.exists() {
        anyhow::bail!("schema file does not exist: {}", path.display());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let parsed = if is_yaml(path) {
        SchemaNode::from_yaml_str(&text)
    } else {
        SchemaNode::from_json_str(&text)
    };
    parsed.with_context(|| format!("invalid schema in {}", path.display()))
}

/// Write `text` to `output`, or stdout when absent.
pub(crate) fn write_output(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}
