//! Integration tests that verify JSON output matches JSON schemas.
//!
//! Command output is checked against the schemas printed by
//! `schema --output-types`, and generated records are checked against the
//! JSON Schema exported for the schema they came from.

use jsonschema::Validator;
use serde_json::Value;
use std::io::Write;
use std::process::Command;
use tempfile::{Builder, NamedTempFile, TempDir};
use test_data_gen::{Generator, Scale};

fn mock_synth_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mock-synth"))
}

fn create_temp_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

fn run_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "Command failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("Invalid JSON output: {}\nOutput: {}", e, stdout))
}

fn load_output_schema(command: &str) -> Validator {
    let schema = run_json(
        mock_synth_bin()
            .args(["schema", "--output-types", "--command"])
            .arg(command),
    );
    Validator::new(&schema).expect("Failed to compile schema")
}

fn assert_valid(validator: &Validator, json: &Value, what: &str) {
    if let Err(error) = validator.validate(json) {
        panic!(
            "{} doesn't match schema:\n  - {}: {}\n\nOutput was:\n{}",
            what,
            error.instance_path(),
            error,
            serde_json::to_string_pretty(json).unwrap()
        );
    }
}

// =============================================================================
// Command output
// =============================================================================

#[test]
fn test_generate_json_matches_schema() {
    let record = Generator::new(9, Scale::Medium).record_schema(8);
    let file = create_temp_file(&record.to_string(), ".json");

    let json = run_json(
        mock_synth_bin()
            .args(["generate", "-n", "5", "--seed", "3", "--json"])
            .arg(file.path()),
    );
    assert_valid(&load_output_schema("generate"), &json, "generate --json");
}

#[test]
fn test_project_json_matches_schema() {
    let doc = Generator::new(21, Scale::Small).generate().to_json();
    let config = create_temp_file(&doc.to_string(), ".json");
    let dir = TempDir::new().unwrap();

    let json = run_json(
        mock_synth_bin()
            .arg("project")
            .arg(config.path())
            .arg("-o")
            .arg(dir.path())
            .arg("--json"),
    );
    assert_valid(&load_output_schema("project"), &json, "project --json");
}

#[test]
fn test_validate_json_matches_schema() {
    let record = Generator::new(4, Scale::Small).record_schema(3);
    let file = create_temp_file(&record.to_string(), ".json");

    let json = run_json(mock_synth_bin().arg("validate").arg(file.path()).arg("--json"));
    assert_valid(&load_output_schema("validate"), &json, "validate --json");
}

#[test]
fn test_generators_json_matches_schema() {
    let json = run_json(mock_synth_bin().args(["generators", "--json"]));
    assert_valid(&load_output_schema("generators"), &json, "generators --json");
}

#[test]
fn test_all_output_schemas_exported() {
    let json = run_json(mock_synth_bin().args(["schema", "--output-types"]));
    let names: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(names, vec!["generate", "generators", "project", "validate"]);
}

// =============================================================================
// Generated records against their exported schema
// =============================================================================

fn check_records_against_export(schema_doc: &Value, parents: Option<&str>, seed: u64) {
    let schema_file = create_temp_file(&schema_doc.to_string(), ".json");
    let exported = run_json(mock_synth_bin().arg("schema").arg(schema_file.path()));
    let validator = Validator::new(&exported).expect("Failed to compile exported schema");

    let parents_file = parents.map(|p| create_temp_file(p, ".json"));
    let mut cmd = mock_synth_bin();
    cmd.args(["generate", "-n", "20", "--seed"])
        .arg(seed.to_string())
        .arg(schema_file.path());
    if let Some(file) = &parents_file {
        cmd.arg("--parents").arg(file.path());
    }
    let rows = run_json(&mut cmd);

    for (i, row) in rows.as_array().unwrap().iter().enumerate() {
        assert_valid(&validator, row, &format!("record {}", i));
    }
}

#[test]
fn test_records_match_exported_schema() {
    for seed in [1, 2, 3] {
        let record = Generator::new(seed, Scale::Large).record_schema(12);
        check_records_against_export(&record, None, seed);
    }
}

#[test]
fn test_fixture_endpoints_match_exported_schema() {
    let project = Generator::new(8, Scale::Small).generate();
    let parents = r#"{
        "categories": ["c1", "c2"],
        "customers": ["u1", "u2", "u3"],
        "products": ["p1", "p2", "p3", "p4"]
    }"#;

    for endpoint in project.endpoints.iter().filter(|e| e.mock_enabled) {
        check_records_against_export(&endpoint.schema(), Some(parents), 5);
    }
}
