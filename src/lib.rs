//! Deterministic, relationship-aware mock record synthesis.
//!
//! A schema describes the shape of one record. [`generate_batch`] walks it
//! once per record, filling primitives from the [`catalog`], nested objects
//! and arrays recursively, and relationship fields from identifiers of
//! other endpoints supplied through an [`IdentifierLookup`].

pub mod batch;
pub mod catalog;
pub mod endpoint;
pub mod error;
pub mod relationship;
pub mod schema;
pub mod seed;
pub mod store;
pub mod walker;

pub use batch::{generate_batch, Batch, BatchGenerator};
pub use catalog::{GeneratorCatalog, GeneratorParams};
pub use endpoint::{run_project, EndpointConfig, EndpointRun, Project};
pub use error::{EngineError, LookupError, ProjectError, SchemaError};
pub use relationship::{IdentifierLookup, NoRelationships, ResourceId};
pub use schema::{to_json_schema, SchemaNode, SchemaPath};
pub use store::MemoryStore;
pub use walker::{GeneratedRecord, RecordGenerator};
