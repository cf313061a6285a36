//! Recursive record generation.
//!
//! The walker turns an object schema into one record. Primitive fields draw
//! from the record's RNG in property order; every nested object and every
//! array item gets its own RNG seeded from the enclosing seed and its path.

use crate::catalog::{GeneratorCatalog, GeneratorParams};
use crate::error::SchemaError;
use crate::relationship::{ResolvedRelationships, ResourceId};
use crate::schema::{ArraySchema, ObjectSchema, PrimitiveSchema, SchemaNode, SchemaPath, ValueType};
use crate::seed;
use rand::rngs::StdRng;
use rand::Rng;
use schemars::JsonSchema;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::trace;

/// One generated record and the parent identifiers it references.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct GeneratedRecord {
    pub fields: Map<String, Value>,
    /// Comma-joined ids of the parent records this record references.
    /// Relationship fields that came out null add nothing here.
    #[serde(rename = "parentResourceIds", serialize_with = "serialize_trace")]
    #[schemars(with = "String")]
    pub parent_resource_ids: Vec<ResourceId>,
}

impl GeneratedRecord {
    /// Comma-joined parent identifiers.
    pub fn parent_trace(&self) -> String {
        self.parent_resource_ids.join(",")
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

fn serialize_trace<S: Serializer>(ids: &[ResourceId], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ids.join(","))
}

/// Per-record state threaded through the walk.
struct RecordContext {
    index: u64,
    parent_ids: Vec<ResourceId>,
}

/// Produces records for one schema.
pub struct RecordGenerator<'a> {
    catalog: &'a GeneratorCatalog,
    relationships: &'a ResolvedRelationships,
}

impl<'a> RecordGenerator<'a> {
    pub fn new(catalog: &'a GeneratorCatalog, relationships: &'a ResolvedRelationships) -> Self {
        Self {
            catalog,
            relationships,
        }
    }

    /// Generate the record at `index`, seeded with `record_seed`.
    ///
    /// The root schema must be an object.
    pub fn generate_one(
        &self,
        schema: &SchemaNode,
        record_seed: u64,
        index: u64,
    ) -> Result<GeneratedRecord, SchemaError> {
        let root = schema.as_object().ok_or(SchemaError::NonObjectRoot {
            found: schema.kind_name(),
        })?;

        let mut ctx = RecordContext {
            index,
            parent_ids: Vec::new(),
        };
        let mut rng = seed::rng_for(record_seed);
        let fields = self.object(root, &SchemaPath::root(), record_seed, &mut rng, &mut ctx);

        Ok(GeneratedRecord {
            fields,
            parent_resource_ids: ctx.parent_ids,
        })
    }

    fn object(
        &self,
        obj: &ObjectSchema,
        path: &SchemaPath,
        seed: u64,
        rng: &mut StdRng,
        ctx: &mut RecordContext,
    ) -> Map<String, Value> {
        let mut fields = Map::with_capacity(obj.properties.len());
        for (name, child) in &obj.properties {
            let child_path = path.field(name);
            let value = self.value(child, &child_path, seed, rng, ctx);
            fields.insert(name.clone(), value);
        }
        fields
    }

    fn value(
        &self,
        node: &SchemaNode,
        path: &SchemaPath,
        seed: u64,
        rng: &mut StdRng,
        ctx: &mut RecordContext,
    ) -> Value {
        match node {
            SchemaNode::Primitive(p) => self.primitive(p, rng),
            SchemaNode::Relationship(_) => self.relationship(path, rng, ctx),
            SchemaNode::Object(obj) => {
                let sub = seed::derive(seed, path);
                trace!(path = %path, seed = sub, "nested object seed");
                let mut sub_rng = seed::rng_for(sub);
                Value::Object(self.object(obj, path, sub, &mut sub_rng, ctx))
            }
            SchemaNode::Array(arr) => self.array(arr, path, seed, rng, ctx),
        }
    }

    fn array(
        &self,
        arr: &ArraySchema,
        path: &SchemaPath,
        seed: u64,
        rng: &mut StdRng,
        ctx: &mut RecordContext,
    ) -> Value {
        let count = item_count(arr, rng);
        let mut items = Vec::with_capacity(count);

        for position in 0..count {
            let item_path = path.item(position);
            let sub = seed::derive(seed, &item_path);
            trace!(path = %item_path, seed = sub, "array item seed");
            let mut item_rng = seed::rng_for(sub);

            let item = match arr.items.as_ref() {
                SchemaNode::Object(obj) => {
                    Value::Object(self.object(obj, &item_path, sub, &mut item_rng, ctx))
                }
                other => self.value(other, &item_path, sub, &mut item_rng, ctx),
            };
            items.push(item);
        }

        Value::Array(items)
    }

    fn primitive(&self, p: &PrimitiveSchema, rng: &mut StdRng) -> Value {
        let params = GeneratorParams::from_primitive(p);

        if let Some(generator_ref) = p.generator_ref.as_deref() {
            return self
                .catalog
                .generate(Some(generator_ref), &params, p.default_value.as_ref(), rng);
        }
        if let Some(default) = &p.default_value {
            return default.clone();
        }
        if !p.enum_values.is_empty() {
            return p.enum_values[rng.random_range(0..p.enum_values.len())].clone();
        }

        let implied = match p.value_type {
            ValueType::String if p.constraints.has_length_bounds() => "string.alphanumeric",
            ValueType::String => "lorem.word",
            ValueType::Integer => "number.int",
            ValueType::Number => "number.float",
            ValueType::Boolean => "datatype.boolean",
            ValueType::Null => return Value::Null,
        };
        self.catalog.generate(Some(implied), &params, None, rng)
    }

    fn relationship(&self, path: &SchemaPath, rng: &mut StdRng, ctx: &mut RecordContext) -> Value {
        let assigned = self
            .relationships
            .binding_for(path)
            .and_then(|binding| binding.assign(ctx.index, rng));

        match assigned {
            Some(id) => {
                ctx.parent_ids.push(id.clone());
                Value::String(id.clone())
            }
            None => Value::Null,
        }
    }
}

/// `count`, else uniform in `[minItems, maxItems]`, else `minItems`, else 1.
fn item_count(arr: &ArraySchema, rng: &mut StdRng) -> usize {
    match (arr.count, arr.min_items, arr.max_items) {
        (Some(count), _, _) => count,
        (None, Some(min), Some(max)) => rng.random_range(min..=max.max(min)),
        (None, Some(min), None) => min,
        (None, None, Some(max)) => max.min(1),
        (None, None, None) => 1,
    }
}
