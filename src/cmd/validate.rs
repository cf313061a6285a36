use super::read_schema;
use mock_synth::relationship::collect_relationship_fields;
use mock_synth::{GeneratorCatalog, SchemaNode};
use schemars::JsonSchema;
use serde::Serialize;
use std::path::PathBuf;

/// JSON output for the validate command
#[derive(Serialize, JsonSchema)]
pub(crate) struct ValidateJsonOutput {
    schema_file: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<SchemaSummary>,
}

#[derive(Serialize, JsonSchema, Default)]
pub(crate) struct SchemaSummary {
    objects: usize,
    arrays: usize,
    primitives: usize,
    relationships: Vec<RelationshipSummary>,
    /// Generator references the catalog does not know; these fields fall back to default or null
    unknown_generators: Vec<String>,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct RelationshipSummary {
    path: String,
    target_endpoint_id: String,
    master_detail: bool,
    null_percentage: u8,
}

pub fn run(schema_file: PathBuf, json: bool) -> anyhow::Result<()> {
    let parsed = read_schema(&schema_file);

    if json {
        let out = match &parsed {
            Ok(schema) => ValidateJsonOutput {
                schema_file: schema_file.display().to_string(),
                valid: true,
                error: None,
                summary: Some(summarize(schema)),
            },
            Err(e) => ValidateJsonOutput {
                schema_file: schema_file.display().to_string(),
                valid: false,
                error: Some(format!("{e:#}")),
                summary: None,
            },
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        if parsed.is_err() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let schema = parsed?;
    let summary = summarize(&schema);

    eprintln!("Schema: {}", schema_file.display());
    eprintln!(
        "  Nodes: {} objects, {} arrays, {} primitives, {} relationships",
        summary.objects,
        summary.arrays,
        summary.primitives,
        summary.relationships.len()
    );
    if !summary.relationships.is_empty() {
        eprintln!();
        eprintln!("  Relationships:");
        for rel in &summary.relationships {
            let mode = if rel.master_detail {
                "master-detail".to_string()
            } else {
                format!("{}% null", rel.null_percentage)
            };
            eprintln!("    - {} -> {} ({})", rel.path, rel.target_endpoint_id, mode);
        }
    }
    if !summary.unknown_generators.is_empty() {
        eprintln!();
        eprintln!("  Unknown generators (values fall back to default or null):");
        for name in &summary.unknown_generators {
            eprintln!("    - {}", name);
        }
    }
    eprintln!();
    eprintln!("Result: VALID");

    Ok(())
}

fn summarize(schema: &SchemaNode) -> SchemaSummary {
    let catalog = GeneratorCatalog::global();
    let mut summary = SchemaSummary::default();

    schema.visit(&mut |_, node| match node {
        SchemaNode::Object(_) => summary.objects += 1,
        SchemaNode::Array(_) => summary.arrays += 1,
        SchemaNode::Primitive(p) => {
            summary.primitives += 1;
            if let Some(name) = p.generator_ref.as_deref() {
                if !catalog.contains(name) && !summary.unknown_generators.iter().any(|n| n == name) {
                    summary.unknown_generators.push(name.to_string());
                }
            }
        }
        SchemaNode::Relationship(_) => {}
    });

    summary.relationships = collect_relationship_fields(schema)
        .into_iter()
        .map(|field| RelationshipSummary {
            path: field.path.to_string(),
            target_endpoint_id: field.target_endpoint_id,
            master_detail: field.master_detail,
            null_percentage: field.null_percentage,
        })
        .collect();

    summary
}
