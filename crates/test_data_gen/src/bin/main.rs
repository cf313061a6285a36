//! CLI for generating test fixtures.
//!
//! Usage:
//!   # Project file with all shop endpoints
//!   gen-fixtures --scale small --seed 42 > fixtures/shop.json
//!
//!   # One standalone record schema with 20 extra fields
//!   gen-fixtures --record-schema 20 --format yaml > record.yaml

use clap::Parser;
use std::fs;
use test_data_gen::{Generator, Scale};

#[derive(Parser, Debug)]
#[command(name = "gen-fixtures")]
#[command(about = "Generate schema and project fixtures for mock-synth", long_about = None)]
struct Args {
    /// Scale preset: small, medium, large, xlarge
    #[arg(short, long, default_value = "small")]
    scale: String,

    /// Random seed for reproducibility
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Output format: json or yaml
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Emit a single record schema with this many extra fields instead of a project
    #[arg(long)]
    record_schema: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let scale: Scale = args.scale.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let mut generator = Generator::new(args.seed, scale);

    let (document, description) = match args.record_schema {
        Some(fields) => (
            generator.record_schema(fields),
            format!("record schema ({} fields)", fields),
        ),
        None => {
            let project = generator.generate();
            let description = format!(
                "{} project ({} endpoints, {} relationships)",
                scale_description(scale),
                project.endpoints.len(),
                project.relationship_count()
            );
            (project.to_json(), description)
        }
    };

    let text = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(&document)?,
        "yaml" | "yml" => serde_yaml_ng::to_string(&document)?,
        other => anyhow::bail!("Unknown format: {}. Use json or yaml", other),
    };

    if let Some(ref path) = args.output {
        fs::write(path, text)?;
        eprintln!("Generated {} to {}", description, path);
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn scale_description(scale: Scale) -> &'static str {
    match scale {
        Scale::Small => "small",
        Scale::Medium => "medium",
        Scale::Large => "large",
        Scale::XLarge => "xlarge",
    }
}
