//! JSON Schema generation for CLI output types.
//!
//! Every command with `--json` output has a schema here, exported through
//! `mock-synth schema --output-types`.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// Schemas for all commands that support --json output, keyed by command.
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    schemas.insert("generate", schema_for!(crate::cmd::GenerateJsonOutput));
    schemas.insert("generators", schema_for!(crate::cmd::GeneratorsJsonOutput));
    schemas.insert("project", schema_for!(crate::cmd::ProjectJsonOutput));
    schemas.insert("validate", schema_for!(crate::cmd::ValidateJsonOutput));

    schemas
}

/// Schema for a single command.
pub fn get_schema(command: &str) -> Option<Schema> {
    all_schemas().remove(command)
}

pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_json_command_has_schema() {
        assert_eq!(
            schema_names(),
            vec!["generate", "generators", "project", "validate"]
        );
    }

    #[test]
    fn test_generate_schema_describes_records() {
        let schema = get_schema("generate").unwrap();
        let text = serde_json::to_string(&schema).unwrap();
        assert!(text.contains("parentResourceIds"));
        assert!(get_schema("nope").is_none());
    }
}
