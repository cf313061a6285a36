use super::{is_yaml, read_schema, to_json, write_output};
use anyhow::Context;
use mock_synth::{BatchGenerator, GeneratedRecord, IdentifierLookup, NoRelationships, ResourceId};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// JSON output for the generate command
#[derive(Serialize, JsonSchema)]
pub(crate) struct GenerateJsonOutput {
    schema_file: String,
    seed: u64,
    requested_count: usize,
    scale_factor: usize,
    record_count: usize,
    elapsed_secs: f64,
    records: Vec<GeneratedRecord>,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    schema_file: PathBuf,
    count: usize,
    seed: Option<u64>,
    parents: Option<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
    pretty: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let schema = read_schema(&schema_file)?;
    let parents = match parents {
        Some(path) => Some(read_parents(&path)?),
        None => None,
    };
    let lookup: &dyn IdentifierLookup = match &parents {
        Some(map) => map,
        None => &NoRelationships,
    };

    let start = Instant::now();
    let batch = BatchGenerator::new(&schema)
        .count(count)
        .seed(seed)
        .generate(lookup)
        .with_context(|| format!("failed to generate records for {}", schema_file.display()))?;
    let elapsed = start.elapsed();

    if !quiet && !json {
        eprintln!(
            "Generated {} records from {} (requested {} x {} parents) in {:.3?} [seed: {}]",
            batch.len(),
            schema_file.display(),
            batch.requested_count,
            batch.scale_factor,
            elapsed,
            batch.seed
        );
    }

    let text = if json {
        let out = GenerateJsonOutput {
            schema_file: schema_file.display().to_string(),
            seed: batch.seed,
            requested_count: batch.requested_count,
            scale_factor: batch.scale_factor,
            record_count: batch.len(),
            elapsed_secs: elapsed.as_secs_f64(),
            records: batch.records,
        };
        to_json(&out, pretty)?
    } else {
        let rows: Vec<&serde_json::Map<String, Value>> =
            batch.records.iter().map(|r| &r.fields).collect();
        to_json(&rows, pretty)?
    };

    write_output(output.as_deref(), &text)
}

/// Parse a parents file: endpoint id mapped to a list of string or numeric ids.
fn read_parents(path: &Path) -> anyhow::Result<HashMap<String, Vec<ResourceId>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read parents file {}", path.display()))?;

    let raw: HashMap<String, Vec<Value>> = if is_yaml(path) {
        serde_yaml_ng::from_str(&text)
            .with_context(|| format!("invalid parents file {}", path.display()))?
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("invalid parents file {}", path.display()))?
    };

    raw.into_iter()
        .map(|(endpoint, ids)| {
            let ids = ids
                .into_iter()
                .map(|id| match id {
                    Value::String(s) => Ok(s),
                    Value::Number(n) => Ok(n.to_string()),
                    other => anyhow::bail!(
                        "parent id for endpoint {:?} must be a string or number, found {}",
                        endpoint,
                        other
                    ),
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok((endpoint, ids))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_parents_mixed_ids() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"users": ["a", 2, 3.5]}}"#).unwrap();
        let parents = read_parents(file.path()).unwrap();
        assert_eq!(parents["users"], vec!["a", "2", "3.5"]);
    }

    #[test]
    fn test_read_parents_rejects_objects() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "users:\n  - {{ id: 1 }}").unwrap();
        let err = read_parents(file.path()).unwrap_err();
        assert!(err.to_string().contains("users"));
    }
}
