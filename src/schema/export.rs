//! Export of an endpoint schema as standard JSON Schema.
//!
//! The exported document is what an external validator checks stored
//! records against: relationships become (nullable) strings, master-detail
//! relationships become required, and objects reject unknown properties.

use super::{ArraySchema, ObjectSchema, PrimitiveSchema, SchemaNode, ValueType};
use serde_json::{json, Map, Value};

/// Convert a parsed schema into a JSON Schema document.
pub fn to_json_schema(node: &SchemaNode) -> Value {
    match node {
        SchemaNode::Object(obj) => object(obj),
        SchemaNode::Array(arr) => array(arr),
        SchemaNode::Primitive(p) => primitive(p),
        SchemaNode::Relationship(rel) => {
            if rel.master_detail {
                json!({ "type": "string" })
            } else {
                json!({ "type": ["string", "null"] })
            }
        }
    }
}

fn object(obj: &ObjectSchema) -> Value {
    let mut properties = Map::new();
    let mut required: Vec<Value> = obj.required.iter().cloned().map(Value::String).collect();

    for (name, child) in &obj.properties {
        properties.insert(name.clone(), to_json_schema(child));
        if let SchemaNode::Relationship(rel) = child {
            if rel.master_detail && !obj.required.contains(name) {
                required.push(Value::String(name.clone()));
            }
        }
    }

    let mut out = Map::new();
    out.insert("type".into(), json!("object"));
    out.insert("properties".into(), Value::Object(properties));
    out.insert("additionalProperties".into(), json!(false));
    if !required.is_empty() {
        out.insert("required".into(), Value::Array(required));
    }
    Value::Object(out)
}

fn array(arr: &ArraySchema) -> Value {
    let mut out = Map::new();
    out.insert("type".into(), json!("array"));
    out.insert("items".into(), to_json_schema(&arr.items));
    match arr.count {
        Some(count) => {
            out.insert("minItems".into(), json!(count));
            out.insert("maxItems".into(), json!(count));
        }
        None => {
            if let Some(min) = arr.min_items {
                out.insert("minItems".into(), json!(min));
            }
            if let Some(max) = arr.max_items {
                out.insert("maxItems".into(), json!(max));
            }
        }
    }
    Value::Object(out)
}

fn primitive(p: &PrimitiveSchema) -> Value {
    let mut out = Map::new();

    // Generators degrade to null on a lookup miss, so any primitive may be null.
    let ty = p.value_type.as_str();
    if p.value_type == ValueType::Null {
        out.insert("type".into(), json!("null"));
    } else {
        out.insert("type".into(), json!([ty, "null"]));
    }

    let c = &p.constraints;
    if let Some(min) = c.min {
        out.insert("minimum".into(), json!(min));
    }
    if let Some(max) = c.max {
        out.insert("maximum".into(), json!(max));
    }
    if let Some(len) = c.length {
        out.insert("minLength".into(), json!(len));
        out.insert("maxLength".into(), json!(len));
    } else {
        if let Some(min) = c.min_length {
            out.insert("minLength".into(), json!(min));
        }
        if let Some(max) = c.max_length {
            out.insert("maxLength".into(), json!(max));
        }
    }
    if !p.enum_values.is_empty() {
        let mut values = p.enum_values.clone();
        values.push(Value::Null);
        out.insert("enum".into(), Value::Array(values));
    }
    Value::Object(out)
}
