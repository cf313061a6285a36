//! In-memory record store.
//!
//! Holds generated records per endpoint and serves their identifiers to the
//! relationship resolver.

use crate::batch::Batch;
use crate::error::LookupError;
use crate::relationship::{IdentifierLookup, ResourceId};
use crate::walker::GeneratedRecord;
use ahash::AHashMap;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: ResourceId,
    pub record: GeneratedRecord,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    endpoints: AHashMap<String, Vec<StoredRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a batch under `endpoint_id`, returning the assigned ids.
    ///
    /// A record keeps its own `id` field when it is a string or number;
    /// otherwise it gets `"{endpoint}-{n}"` with `n` counting from 1.
    pub fn insert_batch(&mut self, endpoint_id: &str, batch: &Batch) -> Vec<ResourceId> {
        let stored = self.endpoints.entry(endpoint_id.to_string()).or_default();
        let mut assigned = Vec::with_capacity(batch.records.len());

        for record in &batch.records {
            let id = match record.get("id") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => format!("{}-{}", endpoint_id, stored.len() + 1),
            };
            assigned.push(id.clone());
            stored.push(StoredRecord {
                id,
                record: record.clone(),
            });
        }

        assigned
    }

    pub fn records(&self, endpoint_id: &str) -> &[StoredRecord] {
        self.endpoints
            .get(endpoint_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self, endpoint_id: &str) -> usize {
        self.records(endpoint_id).len()
    }

    pub fn clear(&mut self, endpoint_id: &str) {
        self.endpoints.remove(endpoint_id);
    }
}

impl IdentifierLookup for MemoryStore {
    fn identifiers(&self, endpoint_id: &str) -> Result<Vec<ResourceId>, LookupError> {
        Ok(self
            .records(endpoint_id)
            .iter()
            .map(|r| r.id.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn batch(ids: &[Value]) -> Batch {
        let records = ids
            .iter()
            .map(|id| {
                let mut fields = Map::new();
                fields.insert("id".to_string(), id.clone());
                GeneratedRecord {
                    fields,
                    parent_resource_ids: Vec::new(),
                }
            })
            .collect();
        Batch {
            records,
            seed: 0,
            requested_count: ids.len(),
            scale_factor: 1,
        }
    }

    #[test]
    fn test_ids_from_records_or_counter() {
        let mut store = MemoryStore::new();
        let ids = store.insert_batch("users", &batch(&[json!("abc"), json!(7), Value::Null]));
        assert_eq!(ids, vec!["abc", "7", "users-3"]);
        assert_eq!(store.identifiers("users").unwrap(), ids);
    }

    #[test]
    fn test_unknown_endpoint_is_empty() {
        let store = MemoryStore::new();
        assert!(store.identifiers("ghosts").unwrap().is_empty());
        assert_eq!(store.len("ghosts"), 0);
    }

    #[test]
    fn test_counter_continues_across_batches() {
        let mut store = MemoryStore::new();
        store.insert_batch("tags", &batch(&[Value::Null]));
        let ids = store.insert_batch("tags", &batch(&[Value::Null]));
        assert_eq!(ids, vec!["tags-2"]);
        store.clear("tags");
        assert_eq!(store.len("tags"), 0);
    }
}
