//! Fixture model for endpoints, fields and relationships.
//!
//! Definitions render to the JSON documents mock-synth reads: one schema
//! per endpoint, and a project file listing all endpoints.

use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Field shapes
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Primitive filled by a named catalog generator
    Generated {
        value_type: &'static str,
        faker: String,
    },
    /// Date generator anchored at a fixed reference date
    Dated { faker: String, ref_date: String },
    Integer { min: i64, max: i64 },
    Number { min: f64, max: f64 },
    /// Plain string, optionally of fixed length
    Text { length: Option<usize> },
    Boolean,
    Enum(Vec<String>),
    Relationship {
        target: String,
        master_detail: bool,
        null_percentage: u8,
    },
    Object(Vec<Field>),
    Array {
        item: Box<FieldKind>,
        min_items: usize,
        max_items: usize,
    },
}

impl FieldKind {
    pub fn generated(value_type: &'static str, faker: &str) -> Self {
        FieldKind::Generated {
            value_type,
            faker: faker.to_string(),
        }
    }

    pub fn relationship(target: &str, master_detail: bool, null_percentage: u8) -> Self {
        FieldKind::Relationship {
            target: target.to_string(),
            master_detail,
            null_percentage,
        }
    }

    /// Render as a schema node
    pub fn to_schema(&self) -> Value {
        match self {
            FieldKind::Generated { value_type, faker } => {
                json!({ "type": value_type, "faker": faker })
            }
            FieldKind::Dated { faker, ref_date } => json!({
                "type": "string",
                "faker": faker,
                "fakerParams": { "refDate": ref_date },
            }),
            FieldKind::Integer { min, max } => json!({ "type": "integer", "min": min, "max": max }),
            FieldKind::Number { min, max } => json!({ "type": "number", "min": min, "max": max }),
            FieldKind::Text { length: Some(n) } => json!({ "type": "string", "length": n }),
            FieldKind::Text { length: None } => json!({ "type": "string" }),
            FieldKind::Boolean => json!({ "type": "boolean" }),
            FieldKind::Enum(values) => json!({ "type": "string", "enum": values }),
            FieldKind::Relationship {
                target,
                master_detail,
                null_percentage,
            } => json!({
                "type": "relationship",
                "endpointId": target,
                "masterDetail": master_detail,
                "nullPercentage": null_percentage,
            }),
            FieldKind::Object(fields) => object_schema(fields),
            FieldKind::Array {
                item,
                min_items,
                max_items,
            } => json!({
                "type": "array",
                "minItems": min_items,
                "maxItems": max_items,
                "items": item.to_schema(),
            }),
        }
    }

    fn collect_targets<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FieldKind::Relationship { target, .. } => {
                if !out.contains(&target.as_str()) {
                    out.push(target);
                }
            }
            FieldKind::Object(fields) => {
                for field in fields {
                    field.kind.collect_targets(out);
                }
            }
            FieldKind::Array { item, .. } => item.collect_targets(out),
            _ => {}
        }
    }
}

/// Named field of an object
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

fn object_schema(fields: &[Field]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        properties.insert(field.name.clone(), field.kind.to_schema());
    }
    let required: Vec<&str> = fields
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name.as_str())
        .collect();

    let mut schema = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

/// One endpoint of a fixture project
#[derive(Debug, Clone)]
pub struct EndpointDef {
    pub id: String,
    pub path: String,
    pub mock_enabled: bool,
    pub mock_count: usize,
    pub faker_seed: Option<u64>,
    pub fields: Vec<Field>,
}

impl EndpointDef {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            path: format!("/{}", id),
            mock_enabled: true,
            mock_count: 5,
            faker_seed: None,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn mock_count(mut self, count: usize) -> Self {
        self.mock_count = count;
        self
    }

    pub fn faker_seed(mut self, seed: u64) -> Self {
        self.faker_seed = Some(seed);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.mock_enabled = false;
        self
    }

    /// Root object schema of this endpoint
    pub fn schema(&self) -> Value {
        object_schema(&self.fields)
    }

    /// Endpoint ids referenced by relationships, in first-seen order
    pub fn dependencies(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for field in &self.fields {
            field.kind.collect_targets(&mut out);
        }
        out
    }

    pub fn relationship_count(&self) -> usize {
        fn count(kind: &FieldKind) -> usize {
            match kind {
                FieldKind::Relationship { .. } => 1,
                FieldKind::Object(fields) => fields.iter().map(|f| count(&f.kind)).sum(),
                FieldKind::Array { item, .. } => count(item),
                _ => 0,
            }
        }
        self.fields.iter().map(|f| count(&f.kind)).sum()
    }

    fn to_json(&self) -> Value {
        let mut endpoint = json!({
            "id": self.id,
            "path": self.path,
            "mockEnabled": self.mock_enabled,
            "mockCount": self.mock_count,
        });
        if let Some(seed) = self.faker_seed {
            endpoint["fakerSeed"] = json!(seed);
        }
        endpoint["schema"] = self.schema();
        endpoint
    }
}

/// A complete fixture project
#[derive(Debug, Clone)]
pub struct ProjectDef {
    pub name: String,
    pub endpoints: Vec<EndpointDef>,
    endpoint_index: HashMap<String, usize>,
}

impl ProjectDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            endpoints: Vec::new(),
            endpoint_index: HashMap::new(),
        }
    }

    pub fn add_endpoint(&mut self, endpoint: EndpointDef) {
        let idx = self.endpoints.len();
        self.endpoint_index.insert(endpoint.id.clone(), idx);
        self.endpoints.push(endpoint);
    }

    pub fn get_endpoint(&self, id: &str) -> Option<&EndpointDef> {
        self.endpoint_index.get(id).map(|&idx| &self.endpoints[idx])
    }

    /// Endpoints with relationship targets before the endpoints using them
    pub fn endpoints_in_order(&self) -> Vec<&EndpointDef> {
        let mut visited = vec![false; self.endpoints.len()];
        let mut result = Vec::with_capacity(self.endpoints.len());

        fn visit<'a>(
            idx: usize,
            endpoints: &'a [EndpointDef],
            endpoint_index: &HashMap<String, usize>,
            visited: &mut [bool],
            result: &mut Vec<&'a EndpointDef>,
        ) {
            if visited[idx] {
                return;
            }
            visited[idx] = true;

            // Targets first
            for target in endpoints[idx].dependencies() {
                if let Some(&dep_idx) = endpoint_index.get(target) {
                    visit(dep_idx, endpoints, endpoint_index, visited, result);
                }
            }

            result.push(&endpoints[idx]);
        }

        for idx in 0..self.endpoints.len() {
            visit(
                idx,
                &self.endpoints,
                &self.endpoint_index,
                &mut visited,
                &mut result,
            );
        }

        result
    }

    pub fn relationship_count(&self) -> usize {
        self.endpoints.iter().map(|e| e.relationship_count()).sum()
    }

    /// Project document in declaration order
    pub fn to_json(&self) -> Value {
        let endpoints: Vec<Value> = self.endpoints.iter().map(|e| e.to_json()).collect();
        json!({ "name": self.name, "endpoints": endpoints })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop() -> ProjectDef {
        let mut project = ProjectDef::new("shop");
        project.add_endpoint(
            EndpointDef::new("orders").field(Field::new(
                "lines",
                FieldKind::Array {
                    item: Box::new(FieldKind::Object(vec![Field::new(
                        "productId",
                        FieldKind::relationship("products", false, 0),
                    )])),
                    min_items: 1,
                    max_items: 3,
                },
            )),
        );
        project.add_endpoint(
            EndpointDef::new("products")
                .field(Field::new("id", FieldKind::generated("string", "string.uuid")).required()),
        );
        project
    }

    #[test]
    fn test_dependencies_found_in_arrays() {
        let project = shop();
        let orders = project.get_endpoint("orders").unwrap();
        assert_eq!(orders.dependencies(), vec!["products"]);
        assert_eq!(project.relationship_count(), 1);
    }

    #[test]
    fn test_order_puts_targets_first() {
        let project = shop();
        let ids: Vec<&str> = project
            .endpoints_in_order()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["products", "orders"]);
    }

    #[test]
    fn test_schema_rendering() {
        let project = shop();
        let schema = project.get_endpoint("products").unwrap().schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["id"]));
        assert_eq!(schema["properties"]["id"]["faker"], "string.uuid");

        let doc = project.to_json();
        assert_eq!(doc["endpoints"][0]["id"], "orders");
        assert_eq!(
            doc["endpoints"][0]["schema"]["properties"]["lines"]["items"]["properties"]["productId"]
                ["endpointId"],
            "products"
        );
    }
}
