//! Test fixture generator for mock-synth.
//!
//! Produces deterministic endpoint schemas and multi-endpoint project files
//! with relationships, nested objects and arrays, for integration tests
//! and benchmarks.
//!
//! # Example
//!
//! ```rust
//! use test_data_gen::{Generator, Scale};
//!
//! // Same seed, same project
//! let mut generator = Generator::new(42, Scale::Small);
//! let project = generator.generate();
//!
//! let json = project.to_json();
//! assert!(json["endpoints"].is_array());
//! ```

pub mod fake;
pub mod generator;
pub mod schema;

pub use generator::{Generator, Scale};
pub use schema::{EndpointDef, Field, FieldKind, ProjectDef};
