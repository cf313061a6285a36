use super::{read_schema, write_output};
use crate::json_schema;
use mock_synth::to_json_schema;
use std::path::PathBuf;

pub fn run(
    schema_file: Option<PathBuf>,
    output_types: bool,
    command: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let text = if output_types {
        match command {
            Some(name) => {
                let schema = json_schema::get_schema(&name).ok_or_else(|| {
                    anyhow::anyhow!(
                        "no JSON output schema for command {:?} (available: {})",
                        name,
                        json_schema::schema_names().join(", ")
                    )
                })?;
                serde_json::to_string_pretty(&schema)?
            }
            None => serde_json::to_string_pretty(&json_schema::all_schemas())?,
        }
    } else {
        let path = schema_file.ok_or_else(|| anyhow::anyhow!("a schema file is required"))?;
        let schema = read_schema(&path)?;
        serde_json::to_string_pretty(&to_json_schema(&schema))?
    };

    write_output(output.as_deref(), &text)
}
