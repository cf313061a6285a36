//! Integration tests for the library API: batches, relationships and
//! whole-project runs over generated fixture projects.

use mock_synth::{
    generate_batch, run_project, BatchGenerator, EngineError, IdentifierLookup, LookupError,
    MemoryStore, NoRelationships, Project, ProjectError, ResourceId, SchemaNode,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use test_data_gen::{Generator, Scale};

fn schema(value: Value) -> SchemaNode {
    SchemaNode::from_value(&value).expect("valid schema")
}

fn fixture_project(seed: u64, scale: Scale) -> Project {
    let doc = Generator::new(seed, scale).generate().to_json();
    Project::from_json_str(&doc.to_string()).expect("fixture project parses")
}

fn parents(target: &str, ids: &[&str]) -> HashMap<String, Vec<ResourceId>> {
    let mut map = HashMap::new();
    map.insert(
        target.to_string(),
        ids.iter().map(|s| s.to_string()).collect(),
    );
    map
}

// =============================================================================
// Batches
// =============================================================================

#[test]
fn test_same_seed_same_batch() {
    let record = Generator::new(11, Scale::Medium).record_schema(10);
    let node = schema(record);

    let a = generate_batch(&node, 25, Some(99), &NoRelationships).unwrap();
    let b = generate_batch(&node, 25, Some(99), &NoRelationships).unwrap();
    assert_eq!(a.records, b.records);
    assert_eq!(a.seed, 99);

    let c = generate_batch(&node, 25, Some(100), &NoRelationships).unwrap();
    assert_ne!(a.records, c.records);
}

#[test]
fn test_reported_seed_replays_unseeded_batch() {
    let node = Generator::new(5, Scale::Small).record_schema(4);
    let node = schema(node);

    let first = generate_batch(&node, 10, None, &NoRelationships).unwrap();
    let replay = generate_batch(&node, 10, Some(first.seed), &NoRelationships).unwrap();
    assert_eq!(first.records, replay.records);
}

#[test]
fn test_prefix_of_larger_batch_is_stable() {
    let node = schema(json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "faker": "person.fullName" },
            "tags": { "type": "array", "minItems": 0, "maxItems": 4,
                      "items": { "type": "string", "faker": "lorem.word" } }
        }
    }));

    let small = generate_batch(&node, 5, Some(3), &NoRelationships).unwrap();
    let large = generate_batch(&node, 50, Some(3), &NoRelationships).unwrap();
    assert_eq!(small.records[..], large.records[..5]);
}

#[test]
fn test_master_detail_scales_and_covers_parents() {
    let node = schema(json!({
        "type": "object",
        "properties": {
            "userId": { "type": "relationship", "endpointId": "users", "masterDetail": true },
            "body": { "type": "string", "faker": "lorem.sentence" }
        }
    }));
    let lookup = parents("users", &["u1", "u2", "u3", "u4"]);

    let batch = BatchGenerator::new(&node)
        .count(3)
        .seed(Some(1))
        .generate(&lookup)
        .unwrap();

    assert_eq!(batch.scale_factor, 4);
    assert_eq!(batch.len(), 12);

    let mut per_parent: HashMap<String, usize> = HashMap::new();
    for record in &batch.records {
        let id = record.get("userId").and_then(Value::as_str).unwrap();
        *per_parent.entry(id.to_string()).or_default() += 1;
        assert_eq!(record.parent_trace(), id);
    }
    assert_eq!(per_parent.len(), 4);
    assert!(per_parent.values().all(|&n| n == 3));
}

#[test]
fn test_nested_relationship_values_come_from_parents() {
    let node = schema(json!({
        "type": "object",
        "properties": {
            "lines": {
                "type": "array", "count": 3,
                "items": {
                    "type": "object",
                    "properties": {
                        "productId": { "type": "relationship", "endpointId": "products",
                                       "nullPercentage": 0 }
                    }
                }
            }
        }
    }));
    let lookup = parents("products", &["p1", "p2"]);
    let batch = generate_batch(&node, 4, Some(8), &lookup).unwrap();

    let allowed: HashSet<&str> = ["p1", "p2"].into_iter().collect();
    for record in &batch.records {
        let lines = record.get("lines").and_then(Value::as_array).unwrap();
        assert_eq!(lines.len(), 3);
        for line in lines {
            let id = line["productId"].as_str().unwrap();
            assert!(allowed.contains(id));
        }
        assert!(!record.parent_resource_ids.is_empty());
    }
}

#[test]
fn test_missing_parents_give_null() {
    let node = schema(json!({
        "type": "object",
        "properties": {
            "ownerId": { "type": "relationship", "endpointId": "owners", "masterDetail": true }
        }
    }));
    let batch = generate_batch(&node, 3, Some(1), &NoRelationships).unwrap();

    assert_eq!(batch.len(), 3);
    for record in &batch.records {
        assert_eq!(record.get("ownerId"), Some(&Value::Null));
        assert_eq!(record.parent_trace(), "");
    }
}

#[test]
fn test_extreme_parameters_generate_without_panicking() {
    let node = schema(json!({
        "type": "object",
        "properties": {
            "wide": { "type": "number", "min": -1e308, "max": 1e308 },
            "price": { "type": "number", "faker": "commerce.price", "min": -1e308, "max": 1e308 },
            "longAgo": { "type": "string", "faker": "date.past",
                         "fakerParams": { "years": u64::MAX } },
            "born": { "type": "string", "faker": "date.birthdate", "max": 1e15 },
            "words": { "type": "string", "faker": "lorem.words",
                       "fakerParams": { "count": u64::MAX } }
        }
    }));

    let batch = generate_batch(&node, 5, Some(1), &NoRelationships).unwrap();
    for record in &batch.records {
        let wide = record.get("wide").and_then(Value::as_f64).unwrap();
        assert!((-1e308..=1e308).contains(&wide));
        for field in ["price", "longAgo", "born", "words"] {
            assert_ne!(record.get(field), Some(&Value::Null), "{} was null", field);
        }
    }
}

struct FailingLookup;

impl IdentifierLookup for FailingLookup {
    fn identifiers(&self, endpoint_id: &str) -> Result<Vec<ResourceId>, LookupError> {
        Err(LookupError::new(format!("store offline for {}", endpoint_id)))
    }
}

#[test]
fn test_lookup_failure_fails_whole_batch() {
    let node = schema(json!({
        "type": "object",
        "properties": {
            "ownerId": { "type": "relationship", "endpointId": "owners" }
        }
    }));
    let err = generate_batch(&node, 3, Some(1), &FailingLookup).unwrap_err();
    assert!(matches!(err, EngineError::Lookup { .. }));
    assert!(err.to_string().contains("owners"));
}

// =============================================================================
// Projects
// =============================================================================

#[test]
fn test_fixture_project_runs_in_dependency_order() {
    let project = fixture_project(42, Scale::Small);
    let mut store = MemoryStore::new();
    let runs = run_project(&project, &mut store).unwrap();

    let order: Vec<&str> = runs.iter().map(|r| r.endpoint_id.as_str()).collect();
    let pos = |id: &str| order.iter().position(|&e| e == id).unwrap();
    assert!(pos("categories") < pos("products"));
    assert!(pos("customers") < pos("orders"));
    assert!(pos("products") < pos("orders"));
    assert!(pos("products") < pos("reviews"));
    assert!(!order.contains(&"drafts"));
    assert_eq!(store.len("drafts"), 0);
}

#[test]
fn test_fixture_project_references_stored_ids() {
    let project = fixture_project(42, Scale::Small);
    let mut store = MemoryStore::new();
    let runs = run_project(&project, &mut store).unwrap();

    let customers: HashSet<String> = store
        .records("customers")
        .iter()
        .map(|r| r.id.clone())
        .collect();
    assert!(!customers.is_empty());

    let orders = runs.iter().find(|r| r.endpoint_id == "orders").unwrap();
    assert_eq!(orders.batch.len(), orders.ids.len());
    let mut seen = HashSet::new();
    for record in &orders.batch.records {
        let customer = record.get("customerId").and_then(Value::as_str).unwrap();
        assert!(customers.contains(customer));
        seen.insert(customer.to_string());
    }
    // Master-detail: every customer has at least one order
    assert_eq!(seen, customers);
}

#[test]
fn test_fixture_project_is_reproducible() {
    let run = |seed| {
        let project = fixture_project(seed, Scale::Small);
        let mut store = MemoryStore::new();
        run_project(&project, &mut store)
            .unwrap()
            .into_iter()
            .map(|r| (r.endpoint_id, r.batch.records))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(17), run(17));
}

#[test]
fn test_project_cycle_is_rejected() {
    let yaml = r#"
endpoints:
  - id: a
    schema:
      type: object
      properties:
        bId: { type: relationship, endpointId: b }
  - id: b
    schema:
      type: object
      properties:
        aId: { type: relationship, endpointId: a }
"#;
    let err = Project::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ProjectError::RelationshipCycle(_)));
}
