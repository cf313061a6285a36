//! Batch orchestration.
//!
//! A batch resolves relationships once, scales the requested count by the
//! largest parent set and generates records `0..scaled` in order. Either
//! every record is produced or the batch fails.

use crate::catalog::GeneratorCatalog;
use crate::error::{EngineError, SchemaError};
use crate::relationship::{self, IdentifierLookup};
use crate::schema::SchemaNode;
use crate::seed;
use crate::walker::{GeneratedRecord, RecordGenerator};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// Records reserved up front; larger batches grow as they go.
const PREALLOCATE_LIMIT: usize = 64 * 1024;

/// Output of one batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub records: Vec<GeneratedRecord>,
    /// Base seed actually used; replaying it reproduces the batch
    pub seed: u64,
    pub requested_count: usize,
    pub scale_factor: usize,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Builder for a single batch run.
pub struct BatchGenerator<'a> {
    schema: &'a SchemaNode,
    catalog: &'a GeneratorCatalog,
    count: usize,
    seed: Option<u64>,
    progress_fn: Option<Box<dyn Fn(u64, u64) + 'a>>,
}

impl<'a> BatchGenerator<'a> {
    pub fn new(schema: &'a SchemaNode) -> Self {
        Self {
            schema,
            catalog: GeneratorCatalog::global(),
            count: 1,
            seed: None,
            progress_fn: None,
        }
    }

    /// Records requested before relationship scaling.
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Base seed; `None` draws a random one.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn catalog(mut self, catalog: &'a GeneratorCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Called with the records generated so far and the scaled total.
    pub fn with_progress<F: Fn(u64, u64) + 'a>(mut self, f: F) -> Self {
        self.progress_fn = Some(Box::new(f));
        self
    }

    pub fn generate(self, lookup: &dyn IdentifierLookup) -> Result<Batch, EngineError> {
        let start = Instant::now();
        if !self.schema.is_object() {
            return Err(SchemaError::NonObjectRoot {
                found: self.schema.kind_name(),
            }
            .into());
        }
        let relationships = relationship::resolve(self.schema, lookup)?;
        let scale_factor = relationships.scale_factor();
        let total = self
            .count
            .checked_mul(scale_factor)
            .ok_or(EngineError::CountOverflow {
                requested: self.count,
                scale_factor,
            })?;
        let base = seed::resolve_base(self.seed);

        info!(
            requested = self.count,
            scale_factor,
            total,
            seed = base,
            "generating batch"
        );

        let generator = RecordGenerator::new(self.catalog, &relationships);
        let mut records = Vec::with_capacity(total.min(PREALLOCATE_LIMIT));
        for index in 0..total as u64 {
            let record = generator.generate_one(self.schema, seed::record_seed(base, index), index)?;
            records.push(record);
            if let Some(ref cb) = self.progress_fn {
                cb(index + 1, total as u64);
            }
        }

        info!(
            records = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "batch complete"
        );

        Ok(Batch {
            records,
            seed: base,
            requested_count: self.count,
            scale_factor,
        })
    }
}

/// Generate `requested_count × M` records for `schema`.
pub fn generate_batch(
    schema: &SchemaNode,
    requested_count: usize,
    seed: Option<u64>,
    lookup: &dyn IdentifierLookup,
) -> Result<Batch, EngineError> {
    BatchGenerator::new(schema)
        .count(requested_count)
        .seed(seed)
        .generate(lookup)
}
