//! Error types for schema parsing and batch generation.
//!
//! Generator lookup misses and relationships without parents are not errors;
//! they degrade to default/null values inside the walker.

use thiserror::Error;

/// Malformed schema node. Fatal for the whole batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("schema node at {path} has no \"type\"")]
    MissingType { path: String },

    #[error("invalid type {found:?} at {path} (expected string, number, integer, boolean, object, array, null or relationship)")]
    InvalidType { path: String, found: String },

    #[error("object schema at {path} has no \"properties\"")]
    MissingProperties { path: String },

    #[error("array schema at {path} has no \"items\"")]
    MissingItems { path: String },

    #[error("invalid {key:?} at {path}: {reason}")]
    InvalidConstraint {
        path: String,
        key: &'static str,
        reason: String,
    },

    #[error("unresolved reference {reference:?} at {path}")]
    UnresolvedRef { path: String, reference: String },

    #[error("schema reference cycle at {path}: {}", .chain.join(" -> "))]
    Cycle { path: String, chain: Vec<String> },

    #[error("only object schemas can be generated at the top level (found {found})")]
    NonObjectRoot { found: &'static str },

    #[error("schema document is not valid {format}: {message}")]
    Syntax {
        format: &'static str,
        message: String,
    },
}

/// Failure reported by an identifier lookup collaborator.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct LookupError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl LookupError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Errors that abort a generation batch.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("{requested} records scaled by {scale_factor} parents overflows the batch size")]
    CountOverflow {
        requested: usize,
        scale_factor: usize,
    },

    #[error("failed to fetch identifiers for endpoint {endpoint_id:?}")]
    Lookup {
        endpoint_id: String,
        #[source]
        source: LookupError,
    },
}

/// Errors from loading or running a multi-endpoint project.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to read project file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse project file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("duplicate endpoint id {0:?}")]
    DuplicateEndpoint(String),

    #[error("endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("endpoint {endpoint:?} references unknown endpoint {target:?}")]
    UnknownTarget { endpoint: String, target: String },

    #[error("endpoint {endpoint:?} has an invalid schema")]
    Schema {
        endpoint: String,
        #[source]
        source: SchemaError,
    },

    #[error("endpoint relationships form a cycle: {}", .0.join(" -> "))]
    RelationshipCycle(Vec<String>),

    #[error("endpoint {endpoint:?}: generation failed")]
    Generation {
        endpoint: String,
        #[source]
        source: EngineError,
    },
}
