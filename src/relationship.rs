//! Relationship resolution across endpoints.
//!
//! Before a batch runs, every relationship field in the schema is collected
//! and the identifiers of its target endpoint are fetched. The largest
//! parent set `M` scales the batch: `count` requested records become
//! `count × M`, which is what gives master-detail relationships full
//! coverage (every parent paired with `count` children).

use crate::error::{EngineError, LookupError};
use crate::schema::{SchemaNode, SchemaPath};
use ahash::AHashMap;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Identifier of a stored resource.
pub type ResourceId = String;

/// Source of existing record identifiers, supplied by the persistence layer.
///
/// Endpoints without records must yield an empty list, not an error.
pub trait IdentifierLookup: Sync {
    fn identifiers(&self, endpoint_id: &str) -> Result<Vec<ResourceId>, LookupError>;
}

/// Lookup for callers that have no stored parents at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRelationships;

impl IdentifierLookup for NoRelationships {
    fn identifiers(&self, _endpoint_id: &str) -> Result<Vec<ResourceId>, LookupError> {
        Ok(Vec::new())
    }
}

impl IdentifierLookup for HashMap<String, Vec<ResourceId>> {
    fn identifiers(&self, endpoint_id: &str) -> Result<Vec<ResourceId>, LookupError> {
        Ok(self.get(endpoint_id).cloned().unwrap_or_default())
    }
}

/// A relationship property found by the schema pre-pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipField {
    pub path: SchemaPath,
    pub field_name: String,
    pub target_endpoint_id: String,
    pub master_detail: bool,
    pub null_percentage: u8,
}

/// Collect relationship fields in property order, descending into nested
/// objects and array items.
pub fn collect_relationship_fields(schema: &SchemaNode) -> Vec<RelationshipField> {
    let mut fields = Vec::new();
    schema.visit(&mut |path, node| {
        if let SchemaNode::Relationship(rel) = node {
            fields.push(RelationshipField {
                path: path.clone(),
                field_name: path.leaf_name().unwrap_or_default().to_string(),
                target_endpoint_id: rel.target_endpoint_id.clone(),
                master_detail: rel.master_detail,
                null_percentage: rel.null_percentage,
            });
        }
    });
    fields
}

/// A relationship field with the parent identifiers fetched for this batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipBinding {
    pub field: RelationshipField,
    pub resolved_parent_ids: Vec<ResourceId>,
}

impl RelationshipBinding {
    /// Parent identifier for the record at `index`, or `None` for null.
    ///
    /// Master-detail fields cycle through the parents in order. Optional
    /// fields draw uniformly from `[0, P × (1 + p/100))`; draws past the
    /// last parent are null, giving a null rate of about `p / (100 + p)`.
    pub fn assign(&self, index: u64, rng: &mut StdRng) -> Option<&ResourceId> {
        let num_parents = self.resolved_parent_ids.len();
        if num_parents == 0 {
            return None;
        }

        if self.field.master_detail {
            return self
                .resolved_parent_ids
                .get((index % num_parents as u64) as usize);
        }

        let span = num_parents as f64 * (1.0 + f64::from(self.field.null_percentage) / 100.0);
        let slot = (rng.random::<f64>() * span) as usize;
        self.resolved_parent_ids.get(slot)
    }
}

/// All bindings of one batch, addressable by schema position.
#[derive(Debug, Clone, Default)]
pub struct ResolvedRelationships {
    bindings: Vec<RelationshipBinding>,
    by_key: AHashMap<String, usize>,
}

impl ResolvedRelationships {
    pub fn new(bindings: Vec<RelationshipBinding>) -> Self {
        let by_key = bindings
            .iter()
            .enumerate()
            .map(|(i, b)| (b.field.path.schema_key(), i))
            .collect();
        Self { bindings, by_key }
    }

    pub fn bindings(&self) -> &[RelationshipBinding] {
        &self.bindings
    }

    /// Binding for a generated location; concrete array positions are ignored.
    pub fn binding_for(&self, path: &SchemaPath) -> Option<&RelationshipBinding> {
        self.by_key
            .get(&path.schema_key())
            .map(|&i| &self.bindings[i])
    }

    /// Largest parent set across all relationships (`M`).
    pub fn max_parents(&self) -> usize {
        self.bindings
            .iter()
            .map(|b| b.resolved_parent_ids.len())
            .max()
            .unwrap_or(0)
    }

    /// Multiplier applied to the requested record count.
    pub fn scale_factor(&self) -> usize {
        self.max_parents().max(1)
    }
}

/// Fetch parent identifiers for every relationship field of `schema`.
///
/// Each distinct target endpoint is fetched once. With several targets the
/// fetches run on scoped threads; all of them finish before this returns.
pub fn resolve(
    schema: &SchemaNode,
    lookup: &dyn IdentifierLookup,
) -> Result<ResolvedRelationships, EngineError> {
    let fields = collect_relationship_fields(schema);
    if fields.is_empty() {
        return Ok(ResolvedRelationships::default());
    }

    let mut targets: Vec<String> = Vec::new();
    for field in &fields {
        if !targets.contains(&field.target_endpoint_id) {
            targets.push(field.target_endpoint_id.clone());
        }
    }

    let fetched = fetch_all(&targets, lookup)?;

    let bindings = fields
        .into_iter()
        .map(|field| {
            let ids = fetched
                .get(&field.target_endpoint_id)
                .cloned()
                .unwrap_or_default();
            if ids.is_empty() {
                warn!(
                    field = %field.path,
                    endpoint = %field.target_endpoint_id,
                    "target endpoint has no records; relationship values will be null"
                );
            } else {
                debug!(
                    field = %field.path,
                    endpoint = %field.target_endpoint_id,
                    parents = ids.len(),
                    "resolved relationship"
                );
            }
            RelationshipBinding {
                field,
                resolved_parent_ids: ids,
            }
        })
        .collect();

    Ok(ResolvedRelationships::new(bindings))
}

fn fetch_all(
    targets: &[String],
    lookup: &dyn IdentifierLookup,
) -> Result<AHashMap<String, Vec<ResourceId>>, EngineError> {
    let fetch = |endpoint_id: &str| {
        lookup
            .identifiers(endpoint_id)
            .map(|ids| (endpoint_id.to_string(), ids))
            .map_err(|source| EngineError::Lookup {
                endpoint_id: endpoint_id.to_string(),
                source,
            })
    };

    if let [only] = targets {
        return fetch(only).map(|pair| [pair].into_iter().collect());
    }

    std::thread::scope(|scope| {
        let fetch = &fetch;
        let handles: Vec<_> = targets
            .iter()
            .map(|endpoint_id| scope.spawn(move || fetch(endpoint_id)))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    })
}
