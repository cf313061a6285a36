//! Schema node model for endpoint record definitions.
//!
//! Schemas arrive as JSON (or YAML) trees authored in the schema builder:
//!
//! ```json
//! {
//!   "type": "object",
//!   "properties": {
//!     "name":    { "type": "string", "faker": "person.fullName" },
//!     "age":     { "type": "integer", "min": 18, "max": 90 },
//!     "tags":    { "type": "array", "minItems": 1, "maxItems": 3,
//!                  "items": { "type": "string", "faker": "lorem.word" } },
//!     "ownerId": { "type": "relationship", "endpointId": "users",
//!                  "masterDetail": true }
//!   }
//! }
//! ```
//!
//! Parsing resolves `$ref` pointers into the root `definitions` map, so the
//! resulting [`SchemaNode`] tree is always finite.

mod export;
mod path;

pub use export::to_json_schema;
pub use path::{PathSegment, SchemaPath};

use crate::error::SchemaError;
use serde_json::{Map, Value};
use std::fmt;

/// Default null rate for optional relationships, in percent.
pub const DEFAULT_NULL_PERCENTAGE: u8 = 10;

const REF_PREFIX: &str = "#/definitions/";

/// Primitive value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Integer => "integer",
            ValueType::Boolean => "boolean",
            ValueType::Null => "null",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter casing applied to generated strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    Upper,
    Lower,
    Mixed,
}

impl std::str::FromStr for Casing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upper" | "uppercase" => Ok(Casing::Upper),
            "lower" | "lowercase" => Ok(Casing::Lower),
            "mixed" => Ok(Casing::Mixed),
            _ => Err(format!(
                "unknown casing: {}. Valid options: upper, lower, mixed",
                s
            )),
        }
    }
}

/// Numeric and string constraints of a primitive node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub length: Option<usize>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub casing: Option<Casing>,
}

impl Constraints {
    pub fn has_length_bounds(&self) -> bool {
        self.length.is_some() || self.min_length.is_some() || self.max_length.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveSchema {
    pub value_type: ValueType,
    /// Dotted `namespace.method` catalog reference
    pub generator_ref: Option<String>,
    /// Free-form extra parameters (`fakerParams`)
    pub generator_params: Map<String, Value>,
    pub default_value: Option<Value>,
    pub constraints: Constraints,
    pub enum_values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    /// Properties in declaration order
    pub properties: Vec<(String, SchemaNode)>,
    pub required: Vec<String>,
}

impl ObjectSchema {
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub items: Box<SchemaNode>,
    pub count: Option<usize>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipSchema {
    pub target_endpoint_id: String,
    pub master_detail: bool,
    pub null_percentage: u8,
}

/// One schema definition.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Primitive(PrimitiveSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
    Relationship(RelationshipSchema),
}

impl SchemaNode {
    /// Parse a schema from a JSON value.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let definitions = value
            .as_object()
            .and_then(|obj| obj.get("definitions"))
            .and_then(Value::as_object);
        let mut parser = Parser {
            definitions,
            ref_stack: Vec::new(),
        };
        parser.node(value, &SchemaPath::root())
    }

    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text).map_err(|e| SchemaError::Syntax {
            format: "JSON",
            message: e.to_string(),
        })?;
        Self::from_value(&value)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_yaml_ng::from_str(text).map_err(|e| SchemaError::Syntax {
            format: "YAML",
            message: e.to_string(),
        })?;
        Self::from_value(&value)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, SchemaNode::Primitive(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, SchemaNode::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, SchemaNode::Array(_))
    }

    pub fn is_relationship(&self) -> bool {
        matches!(self, SchemaNode::Relationship(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            SchemaNode::Primitive(_) => "primitive",
            SchemaNode::Object(_) => "object",
            SchemaNode::Array(_) => "array",
            SchemaNode::Relationship(_) => "relationship",
        }
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            SchemaNode::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Depth-first, pre-order walk over every node.
    ///
    /// Array item schemas are visited under an `[]` segment.
    pub fn visit<F>(&self, f: &mut F)
    where
        F: FnMut(&SchemaPath, &SchemaNode),
    {
        self.visit_at(&SchemaPath::root(), f);
    }

    fn visit_at<F>(&self, path: &SchemaPath, f: &mut F)
    where
        F: FnMut(&SchemaPath, &SchemaNode),
    {
        f(path, self);
        match self {
            SchemaNode::Object(obj) => {
                for (name, child) in &obj.properties {
                    child.visit_at(&path.field(name), f);
                }
            }
            SchemaNode::Array(arr) => arr.items.visit_at(&path.items(), f),
            SchemaNode::Primitive(_) | SchemaNode::Relationship(_) => {}
        }
    }
}

struct Parser<'a> {
    definitions: Option<&'a Map<String, Value>>,
    /// Definition names on the current resolution path
    ref_stack: Vec<String>,
}

impl<'a> Parser<'a> {
    fn node(&mut self, value: &'a Value, path: &SchemaPath) -> Result<SchemaNode, SchemaError> {
        let obj = value.as_object().ok_or_else(|| SchemaError::InvalidType {
            path: path.to_string(),
            found: json_kind(value).to_string(),
        })?;

        if let Some(reference) = obj.get("$ref") {
            return self.reference(reference, path);
        }

        let ty = match obj.get("type") {
            None | Some(Value::Null) => {
                return Err(SchemaError::MissingType {
                    path: path.to_string(),
                })
            }
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                return Err(SchemaError::InvalidType {
                    path: path.to_string(),
                    found: other.to_string(),
                })
            }
        };

        match ty {
            "object" => self.object(obj, path),
            "array" => self.array(obj, path),
            "relationship" => relationship(obj, path),
            "string" => primitive(obj, ValueType::String, path),
            "number" => primitive(obj, ValueType::Number, path),
            "integer" => primitive(obj, ValueType::Integer, path),
            "boolean" => primitive(obj, ValueType::Boolean, path),
            "null" => primitive(obj, ValueType::Null, path),
            other => Err(SchemaError::InvalidType {
                path: path.to_string(),
                found: other.to_string(),
            }),
        }
    }

    fn reference(&mut self, reference: &Value, path: &SchemaPath) -> Result<SchemaNode, SchemaError> {
        let raw = reference.as_str().unwrap_or_default();
        let unresolved = || SchemaError::UnresolvedRef {
            path: path.to_string(),
            reference: reference.to_string(),
        };
        let name = raw.strip_prefix(REF_PREFIX).ok_or_else(unresolved)?;

        if let Some(pos) = self.ref_stack.iter().position(|n| n == name) {
            let mut chain = self.ref_stack[pos..].to_vec();
            chain.push(name.to_string());
            return Err(SchemaError::Cycle {
                path: path.to_string(),
                chain,
            });
        }

        let target = self
            .definitions
            .and_then(|defs| defs.get(name))
            .ok_or_else(unresolved)?;

        self.ref_stack.push(name.to_string());
        let result = self.node(target, path);
        self.ref_stack.pop();
        result
    }

    fn object(
        &mut self,
        obj: &'a Map<String, Value>,
        path: &SchemaPath,
    ) -> Result<SchemaNode, SchemaError> {
        let props = match obj.get("properties") {
            None | Some(Value::Null) => {
                return Err(SchemaError::MissingProperties {
                    path: path.to_string(),
                })
            }
            Some(Value::Object(props)) => props,
            Some(_) => return Err(invalid(path, "properties", "must be an object")),
        };

        let mut properties = Vec::with_capacity(props.len());
        for (name, child) in props {
            let node = self.node(child, &path.field(name))?;
            properties.push((name.clone(), node));
        }

        let required = match obj.get("required") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(names)) => names
                .iter()
                .map(|n| {
                    n.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid(path, "required", "must list property names"))
                })
                .collect::<Result<_, _>>()?,
            Some(_) => return Err(invalid(path, "required", "must be an array")),
        };

        Ok(SchemaNode::Object(ObjectSchema {
            properties,
            required,
        }))
    }

    fn array(
        &mut self,
        obj: &'a Map<String, Value>,
        path: &SchemaPath,
    ) -> Result<SchemaNode, SchemaError> {
        let items = match obj.get("items") {
            None | Some(Value::Null) => {
                return Err(SchemaError::MissingItems {
                    path: path.to_string(),
                })
            }
            Some(items) => self.node(items, &path.items())?,
        };

        let count = get_usize(obj, "count", path)?;
        let min_items = get_usize(obj, "minItems", path)?;
        let max_items = get_usize(obj, "maxItems", path)?;
        if let (Some(lo), Some(hi)) = (min_items, max_items) {
            if lo > hi {
                return Err(invalid(
                    path,
                    "minItems",
                    &format!("{} is greater than maxItems {}", lo, hi),
                ));
            }
        }

        Ok(SchemaNode::Array(ArraySchema {
            items: Box::new(items),
            count,
            min_items,
            max_items,
        }))
    }
}

fn relationship(obj: &Map<String, Value>, path: &SchemaPath) -> Result<SchemaNode, SchemaError> {
    let target_endpoint_id = match obj.get("endpointId") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(invalid(
                path,
                "endpointId",
                "relationship requires a target endpoint id",
            ))
        }
    };

    let master_detail = match obj.get("masterDetail") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => return Err(invalid(path, "masterDetail", "must be a boolean")),
    };

    let null_percentage = match get_usize(obj, "nullPercentage", path)? {
        None => DEFAULT_NULL_PERCENTAGE,
        Some(p) if p <= 100 => p as u8,
        Some(p) => {
            return Err(invalid(
                path,
                "nullPercentage",
                &format!("{} is outside 0..=100", p),
            ))
        }
    };

    Ok(SchemaNode::Relationship(RelationshipSchema {
        target_endpoint_id,
        master_detail,
        null_percentage,
    }))
}

fn primitive(
    obj: &Map<String, Value>,
    value_type: ValueType,
    path: &SchemaPath,
) -> Result<SchemaNode, SchemaError> {
    let generator_ref = get_string(obj, "faker", path)?.filter(|s| !s.is_empty());

    let generator_params = match obj.get("fakerParams") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(params)) => params.clone(),
        Some(_) => return Err(invalid(path, "fakerParams", "must be an object")),
    };

    let enum_values = match obj.get("enum") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values.clone(),
        Some(_) => return Err(invalid(path, "enum", "must be an array")),
    };

    let casing = match get_string(obj, "casing", path)? {
        None => None,
        Some(s) => Some(
            s.parse::<Casing>()
                .map_err(|e| invalid(path, "casing", &e))?,
        ),
    };

    let constraints = Constraints {
        min: get_f64(obj, "min", path)?,
        max: get_f64(obj, "max", path)?,
        min_length: get_usize(obj, "minLength", path)?,
        max_length: get_usize(obj, "maxLength", path)?,
        length: get_usize(obj, "length", path)?,
        prefix: get_string(obj, "prefix", path)?,
        suffix: get_string(obj, "suffix", path)?,
        casing,
    };

    if let (Some(lo), Some(hi)) = (constraints.min, constraints.max) {
        if lo > hi {
            return Err(invalid(path, "min", &format!("{} is greater than max {}", lo, hi)));
        }
    }
    if value_type == ValueType::Integer || generator_ref.as_deref() == Some("number.int") {
        if let (Some(lo), Some(hi)) = (constraints.min, constraints.max) {
            if lo.ceil() > hi.floor() {
                return Err(invalid(
                    path,
                    "min",
                    &format!("no integer lies between {} and {}", lo, hi),
                ));
            }
        }
    }
    if let (Some(lo), Some(hi)) = (constraints.min_length, constraints.max_length) {
        if lo > hi {
            return Err(invalid(
                path,
                "minLength",
                &format!("{} is greater than maxLength {}", lo, hi),
            ));
        }
    }

    Ok(SchemaNode::Primitive(PrimitiveSchema {
        value_type,
        generator_ref,
        generator_params,
        default_value: obj.get("default").filter(|v| !v.is_null()).cloned(),
        constraints,
        enum_values,
    }))
}

fn invalid(path: &SchemaPath, key: &'static str, reason: &str) -> SchemaError {
    SchemaError::InvalidConstraint {
        path: path.to_string(),
        key,
        reason: reason.to_string(),
    }
}

fn get_f64(
    obj: &Map<String, Value>,
    key: &'static str,
    path: &SchemaPath,
) -> Result<Option<f64>, SchemaError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(_) => Err(invalid(path, key, "must be a number")),
    }
}

fn get_usize(
    obj: &Map<String, Value>,
    key: &'static str,
    path: &SchemaPath,
) -> Result<Option<usize>, SchemaError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|v| Some(v as usize))
            .ok_or_else(|| invalid(path, key, "must be a non-negative integer")),
        Some(_) => Err(invalid(path, key, "must be a non-negative integer")),
    }
}

fn get_string(
    obj: &Map<String, Value>,
    key: &'static str,
    path: &SchemaPath,
) -> Result<Option<String>, SchemaError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(path, key, "must be a string")),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object_keeps_property_order() {
        let node = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": {
                "zeta": { "type": "string" },
                "alpha": { "type": "integer", "min": 1, "max": 5 },
                "mid": { "type": "boolean" }
            }
        }))
        .unwrap();

        let obj = node.as_object().unwrap();
        let names: Vec<&str> = obj.properties.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);

        match obj.property("alpha").unwrap() {
            SchemaNode::Primitive(p) => {
                assert_eq!(p.value_type, ValueType::Integer);
                assert_eq!(p.constraints.min, Some(1.0));
                assert_eq!(p.constraints.max, Some(5.0));
            }
            other => panic!("expected primitive, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_type() {
        let err = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": { "name": { "faker": "person.firstName" } }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingType {
                path: "name".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_type() {
        let err = SchemaNode::from_value(&json!({ "type": "date" })).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidType { ref found, .. } if found == "date"));
    }

    #[test]
    fn test_object_without_properties() {
        let err = SchemaNode::from_value(&json!({ "type": "object" })).unwrap_err();
        assert!(matches!(err, SchemaError::MissingProperties { .. }));
    }

    #[test]
    fn test_array_without_items() {
        let err = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": { "tags": { "type": "array", "count": 2 } }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingItems {
                path: "tags".to_string()
            }
        );
    }

    #[test]
    fn test_relationship_defaults() {
        let node = SchemaNode::from_value(&json!({
            "type": "relationship",
            "endpointId": 42
        }))
        .unwrap();
        assert_eq!(
            node,
            SchemaNode::Relationship(RelationshipSchema {
                target_endpoint_id: "42".to_string(),
                master_detail: false,
                null_percentage: DEFAULT_NULL_PERCENTAGE,
            })
        );
    }

    #[test]
    fn test_relationship_rejects_bad_null_percentage() {
        let err = SchemaNode::from_value(&json!({
            "type": "relationship",
            "endpointId": "users",
            "nullPercentage": 150
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidConstraint {
                key: "nullPercentage",
                ..
            }
        ));
    }

    #[test]
    fn test_integer_bounds_without_integer_between() {
        let err = SchemaNode::from_value(&json!({ "type": "integer", "min": 1.2, "max": 1.8 }))
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidConstraint { key: "min", .. }));

        let err = SchemaNode::from_value(&json!({
            "type": "string", "faker": "number.int", "min": 3.1, "max": 3.9
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidConstraint { key: "min", .. }));

        assert!(SchemaNode::from_value(&json!({ "type": "integer", "min": 1.2, "max": 2.0 })).is_ok());
        assert!(SchemaNode::from_value(&json!({ "type": "number", "min": 1.2, "max": 1.8 })).is_ok());
    }

    #[test]
    fn test_min_items_above_max_items() {
        let err = SchemaNode::from_value(&json!({
            "type": "array",
            "items": { "type": "string" },
            "minItems": 4,
            "maxItems": 2
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidConstraint { key: "minItems", .. }
        ));
    }

    #[test]
    fn test_ref_is_inlined() {
        let node = SchemaNode::from_value(&json!({
            "type": "object",
            "definitions": {
                "address": {
                    "type": "object",
                    "properties": { "city": { "type": "string", "faker": "location.city" } }
                }
            },
            "properties": {
                "home": { "$ref": "#/definitions/address" },
                "work": { "$ref": "#/definitions/address" }
            }
        }))
        .unwrap();

        let obj = node.as_object().unwrap();
        assert!(obj.property("home").unwrap().is_object());
        assert_eq!(obj.property("home"), obj.property("work"));
    }

    #[test]
    fn test_ref_cycle_is_rejected() {
        let err = SchemaNode::from_value(&json!({
            "type": "object",
            "definitions": {
                "node": {
                    "type": "object",
                    "properties": { "next": { "$ref": "#/definitions/node" } }
                }
            },
            "properties": { "head": { "$ref": "#/definitions/node" } }
        }))
        .unwrap_err();

        match err {
            SchemaError::Cycle { path, chain } => {
                assert_eq!(path, "head.next");
                assert_eq!(chain, vec!["node".to_string(), "node".to_string()]);
            }
            other => panic!("expected cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_ref() {
        let err = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": { "home": { "$ref": "#/definitions/missing" } }
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedRef { .. }));
    }

    #[test]
    fn test_visit_reaches_array_items() {
        let node = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": {
                "lines": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": { "sku": { "type": "string" } }
                    }
                }
            }
        }))
        .unwrap();

        let mut seen = Vec::new();
        node.visit(&mut |path, _| seen.push(path.schema_key()));
        assert_eq!(seen, vec!["", "lines", "lines[]", "lines[].sku"]);
    }

    #[test]
    fn test_from_yaml_str() {
        let node = SchemaNode::from_yaml_str(
            r#"
type: object
properties:
  email:
    type: string
    faker: internet.email
    casing: lower
"#,
        )
        .unwrap();
        match node.as_object().unwrap().property("email").unwrap() {
            SchemaNode::Primitive(p) => {
                assert_eq!(p.generator_ref.as_deref(), Some("internet.email"));
                assert_eq!(p.constraints.casing, Some(Casing::Lower));
            }
            other => panic!("expected primitive, got {:?}", other),
        }
    }
}
