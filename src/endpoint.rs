//! Endpoints and multi-endpoint projects.
//!
//! A project file lists endpoints with their mock settings and schemas:
//!
//! ```yaml
//! endpoints:
//!   - id: users
//!     path: /users
//!     mockCount: 5
//!     fakerSeed: 42
//!     schema:
//!       type: object
//!       properties:
//!         id: { type: string, faker: string.uuid }
//!   - id: orders
//!     schema:
//!       type: object
//!       properties:
//!         userId: { type: relationship, endpointId: users, masterDetail: true }
//! ```
//!
//! Endpoints are generated so that every relationship target is filled
//! before the endpoints that point at it.

use crate::batch::{Batch, BatchGenerator};
use crate::error::ProjectError;
use crate::relationship::{collect_relationship_fields, ResourceId};
use crate::schema::SchemaNode;
use crate::store::MemoryStore;
use ahash::AHashMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

pub const DEFAULT_MOCK_COUNT: usize = 5;
pub const MAX_MOCK_COUNT: usize = 25_000;

/// Mock settings and schema of one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointConfig {
    pub id: String,
    pub path: String,
    pub mock_enabled: bool,
    pub mock_count: usize,
    pub faker_seed: Option<u64>,
    pub schema: SchemaNode,
}

impl EndpointConfig {
    pub fn should_generate(&self) -> bool {
        self.mock_enabled && self.mock_count > 0
    }

    /// Endpoints this endpoint's relationships point at, without duplicates.
    pub fn dependencies(&self) -> Vec<String> {
        let mut deps: Vec<String> = Vec::new();
        for field in collect_relationship_fields(&self.schema) {
            if !deps.contains(&field.target_endpoint_id) {
                deps.push(field.target_endpoint_id);
            }
        }
        deps
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProject {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    endpoints: Vec<RawEndpoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEndpoint {
    id: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(default = "default_true")]
    mock_enabled: bool,
    #[serde(default = "default_mock_count")]
    mock_count: usize,
    #[serde(default)]
    faker_seed: Option<RawSeed>,
    schema: Value,
}

/// Seeds may be written as numbers or numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSeed {
    Number(u64),
    Text(String),
}

fn default_true() -> bool {
    true
}

fn default_mock_count() -> usize {
    DEFAULT_MOCK_COUNT
}

impl RawEndpoint {
    fn into_config(self) -> Result<EndpointConfig, ProjectError> {
        let invalid = |reason: String| ProjectError::InvalidEndpoint {
            endpoint: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty".to_string()));
        }
        if self.mock_count > MAX_MOCK_COUNT {
            return Err(invalid(format!(
                "mockCount {} exceeds the maximum of {}",
                self.mock_count, MAX_MOCK_COUNT
            )));
        }

        let faker_seed = match &self.faker_seed {
            None => None,
            Some(RawSeed::Number(n)) => Some(*n),
            Some(RawSeed::Text(s)) if s.trim().is_empty() => None,
            Some(RawSeed::Text(s)) => Some(
                s.trim()
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("fakerSeed {:?} is not a number", s)))?,
            ),
        };

        let schema = SchemaNode::from_value(&self.schema).map_err(|source| ProjectError::Schema {
            endpoint: self.id.clone(),
            source,
        })?;
        if !schema.is_object() {
            return Err(invalid(format!(
                "schema root must be an object, found {}",
                schema.kind_name()
            )));
        }

        let path = self.path.unwrap_or_else(|| format!("/{}", self.id));
        Ok(EndpointConfig {
            id: self.id,
            path,
            mock_enabled: self.mock_enabled,
            mock_count: self.mock_count,
            faker_seed,
            schema,
        })
    }
}

/// A set of endpoints in generation order.
#[derive(Debug, Clone)]
pub struct Project {
    pub name: Option<String>,
    endpoints: Vec<EndpointConfig>,
}

impl Project {
    /// Validate and order `endpoints` so relationship targets come first.
    ///
    /// An endpoint may reference itself; its relationships then see only
    /// records stored before the run.
    pub fn new(endpoints: Vec<EndpointConfig>) -> Result<Self, ProjectError> {
        let mut index: AHashMap<&str, usize> = AHashMap::new();
        for (i, endpoint) in endpoints.iter().enumerate() {
            if index.insert(endpoint.id.as_str(), i).is_some() {
                return Err(ProjectError::DuplicateEndpoint(endpoint.id.clone()));
            }
        }

        let mut deps: Vec<Vec<usize>> = Vec::with_capacity(endpoints.len());
        for endpoint in &endpoints {
            let mut targets = Vec::new();
            for target in endpoint.dependencies() {
                match index.get(target.as_str()) {
                    Some(_) if endpoint.id == target => {}
                    Some(&j) => targets.push(j),
                    None => {
                        return Err(ProjectError::UnknownTarget {
                            endpoint: endpoint.id.clone(),
                            target,
                        })
                    }
                }
            }
            deps.push(targets);
        }

        let order = topological_order(&endpoints, &deps)?;
        let mut slots: Vec<Option<EndpointConfig>> = endpoints.into_iter().map(Some).collect();
        let endpoints = order
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();

        Ok(Self {
            name: None,
            endpoints,
        })
    }

    /// Load a project from YAML (`.yaml`/`.yml`) or JSON.
    pub fn from_path(path: &Path) -> Result<Self, ProjectError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ProjectError::Io {
            path: display.clone(),
            source,
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            Self::from_yaml_str(&text).map_err(|e| with_path(e, &display))
        } else {
            Self::from_json_str(&text).map_err(|e| with_path(e, &display))
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ProjectError> {
        let raw: RawProject = serde_yaml_ng::from_str(text).map_err(|e| ProjectError::Parse {
            path: String::new(),
            message: e.to_string(),
        })?;
        Self::from_raw(raw)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ProjectError> {
        let raw: RawProject = serde_json::from_str(text).map_err(|e| ProjectError::Parse {
            path: String::new(),
            message: e.to_string(),
        })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawProject) -> Result<Self, ProjectError> {
        let endpoints = raw
            .endpoints
            .into_iter()
            .map(RawEndpoint::into_config)
            .collect::<Result<Vec<_>, _>>()?;
        let mut project = Self::new(endpoints)?;
        project.name = raw.name;
        Ok(project)
    }

    /// Endpoints in generation order.
    pub fn endpoints(&self) -> &[EndpointConfig] {
        &self.endpoints
    }

    pub fn endpoint(&self, id: &str) -> Option<&EndpointConfig> {
        self.endpoints.iter().find(|e| e.id == id)
    }
}

fn with_path(err: ProjectError, path: &str) -> ProjectError {
    match err {
        ProjectError::Parse { message, .. } => ProjectError::Parse {
            path: path.to_string(),
            message,
        },
        other => other,
    }
}

/// Depth-first ordering with dependencies first; back edges are cycles.
fn topological_order(
    endpoints: &[EndpointConfig],
    deps: &[Vec<usize>],
) -> Result<Vec<usize>, ProjectError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    fn visit(
        idx: usize,
        deps: &[Vec<usize>],
        marks: &mut [Mark],
        stack: &mut Vec<usize>,
        result: &mut Vec<usize>,
    ) -> Result<(), Vec<usize>> {
        match marks[idx] {
            Mark::Done => return Ok(()),
            Mark::Active => {
                let start = stack.iter().position(|&i| i == idx).unwrap_or(0);
                let mut cycle = stack[start..].to_vec();
                cycle.push(idx);
                return Err(cycle);
            }
            Mark::New => {}
        }

        marks[idx] = Mark::Active;
        stack.push(idx);
        for &dep in &deps[idx] {
            visit(dep, deps, marks, stack, result)?;
        }
        stack.pop();
        marks[idx] = Mark::Done;
        result.push(idx);
        Ok(())
    }

    let mut marks = vec![Mark::New; endpoints.len()];
    let mut stack = Vec::new();
    let mut result = Vec::with_capacity(endpoints.len());
    for idx in 0..endpoints.len() {
        visit(idx, deps, &mut marks, &mut stack, &mut result).map_err(|cycle| {
            ProjectError::RelationshipCycle(
                cycle.into_iter().map(|i| endpoints[i].id.clone()).collect(),
            )
        })?;
    }
    Ok(result)
}

/// Result of generating one endpoint.
#[derive(Debug, Clone)]
pub struct EndpointRun {
    pub endpoint_id: String,
    pub batch: Batch,
    /// Identifiers the store assigned to the batch's records
    pub ids: Vec<ResourceId>,
}

/// Generate every enabled endpoint in order, storing each batch so later
/// endpoints can reference it.
pub fn run_project(
    project: &Project,
    store: &mut MemoryStore,
) -> Result<Vec<EndpointRun>, ProjectError> {
    run_project_with_progress(project, store, |_, _, _| {})
}

/// Like [`run_project`], reporting `(endpoint_id, done, total)` per record.
pub fn run_project_with_progress<F>(
    project: &Project,
    store: &mut MemoryStore,
    progress: F,
) -> Result<Vec<EndpointRun>, ProjectError>
where
    F: Fn(&str, u64, u64),
{
    let mut runs = Vec::new();

    for endpoint in project.endpoints() {
        if !endpoint.should_generate() {
            info!(endpoint = %endpoint.id, "mock generation disabled, skipping");
            continue;
        }

        let id = endpoint.id.as_str();
        let batch = BatchGenerator::new(&endpoint.schema)
            .count(endpoint.mock_count)
            .seed(endpoint.faker_seed)
            .with_progress(|done, total| progress(id, done, total))
            .generate(&*store)
            .map_err(|source| ProjectError::Generation {
                endpoint: endpoint.id.clone(),
                source,
            })?;

        let ids = store.insert_batch(id, &batch);
        info!(endpoint = %endpoint.id, records = ids.len(), seed = batch.seed, "endpoint generated");
        runs.push(EndpointRun {
            endpoint_id: endpoint.id.clone(),
            batch,
            ids,
        });
    }

    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::IdentifierLookup;

    const SHOP: &str = r#"
name: shop
endpoints:
  - id: orders
    mockCount: 2
    fakerSeed: "7"
    schema:
      type: object
      properties:
        id: { type: string, faker: string.uuid }
        customerId: { type: relationship, endpointId: customers, masterDetail: true }
  - id: customers
    path: /api/customers
    mockCount: 3
    fakerSeed: 42
    schema:
      type: object
      properties:
        id: { type: string, faker: string.uuid }
        name: { type: string, faker: person.fullName }
  - id: drafts
    mockEnabled: false
    schema:
      type: object
      properties:
        title: { type: string }
"#;

    #[test]
    fn test_parse_and_order() {
        let project = Project::from_yaml_str(SHOP).unwrap();
        assert_eq!(project.name.as_deref(), Some("shop"));

        let ids: Vec<&str> = project.endpoints().iter().map(|e| e.id.as_str()).collect();
        let customers = ids.iter().position(|&i| i == "customers").unwrap();
        let orders = ids.iter().position(|&i| i == "orders").unwrap();
        assert!(customers < orders);

        let orders = project.endpoint("orders").unwrap();
        assert_eq!(orders.path, "/orders");
        assert_eq!(orders.faker_seed, Some(7));
        assert!(orders.mock_enabled);
        assert!(!project.endpoint("drafts").unwrap().should_generate());
    }

    #[test]
    fn test_run_project_resolves_relationships() {
        let project = Project::from_yaml_str(SHOP).unwrap();
        let mut store = MemoryStore::new();
        let runs = run_project(&project, &mut store).unwrap();

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].endpoint_id, "customers");
        assert_eq!(runs[0].batch.len(), 3);

        let orders = &runs[1];
        assert_eq!(orders.batch.scale_factor, 3);
        assert_eq!(orders.batch.len(), 6);

        let customer_ids = store.identifiers("customers").unwrap();
        for (i, record) in orders.batch.records.iter().enumerate() {
            let customer = record.get("customerId").and_then(Value::as_str).unwrap();
            assert_eq!(customer, customer_ids[i % 3]);
            assert_eq!(record.parent_trace(), customer);
        }
        assert_eq!(store.len("drafts"), 0);
    }

    #[test]
    fn test_cycle_rejected() {
        let text = r#"
endpoints:
  - id: a
    schema: { type: object, properties: { b: { type: relationship, endpointId: b } } }
  - id: b
    schema: { type: object, properties: { a: { type: relationship, endpointId: a } } }
"#;
        match Project::from_yaml_str(text).unwrap_err() {
            ProjectError::RelationshipCycle(chain) => assert_eq!(chain, vec!["a", "b", "a"]),
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_reference_allowed() {
        let text = r#"
endpoints:
  - id: categories
    schema:
      type: object
      properties:
        parentId: { type: relationship, endpointId: categories }
"#;
        let project = Project::from_yaml_str(text).unwrap();
        let mut store = MemoryStore::new();
        let runs = run_project(&project, &mut store).unwrap();
        assert_eq!(runs[0].batch.len(), DEFAULT_MOCK_COUNT);
        assert!(runs[0]
            .batch
            .records
            .iter()
            .all(|r| r.get("parentId") == Some(&Value::Null)));
    }

    #[test]
    fn test_validation_errors() {
        let dup = r#"{"endpoints": [
            {"id": "a", "schema": {"type": "object", "properties": {}}},
            {"id": "a", "schema": {"type": "object", "properties": {}}}
        ]}"#;
        assert!(matches!(
            Project::from_json_str(dup).unwrap_err(),
            ProjectError::DuplicateEndpoint(id) if id == "a"
        ));

        let unknown = r#"{"endpoints": [
            {"id": "a", "schema": {"type": "object", "properties": {
                "x": {"type": "relationship", "endpointId": "zzz"}
            }}}
        ]}"#;
        assert!(matches!(
            Project::from_json_str(unknown).unwrap_err(),
            ProjectError::UnknownTarget { target, .. } if target == "zzz"
        ));

        let too_many = r#"{"endpoints": [
            {"id": "a", "mockCount": 30000, "schema": {"type": "object", "properties": {}}}
        ]}"#;
        assert!(matches!(
            Project::from_json_str(too_many).unwrap_err(),
            ProjectError::InvalidEndpoint { .. }
        ));

        let blank = r#"{"endpoints": [{"id": " ", "schema": {"type": "object", "properties": {}}}]}"#;
        assert!(matches!(
            Project::from_json_str(blank).unwrap_err(),
            ProjectError::InvalidEndpoint { .. }
        ));

        let bad_schema = r#"{"endpoints": [{"id": "a", "schema": {"properties": {}}}]}"#;
        assert!(matches!(
            Project::from_json_str(bad_schema).unwrap_err(),
            ProjectError::Schema { .. }
        ));
    }

    #[test]
    fn test_from_path_reports_file() {
        let err = Project::from_path(Path::new("/nonexistent/project.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/project.yaml"));
    }
}
