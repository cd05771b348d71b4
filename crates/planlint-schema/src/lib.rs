//! Planlint Schema Registry
//!
//! Owns the JSON Schema documents that guard document *shape*:
//!
//! - `experiment_plan`: microscopy experiment plans
//! - `procedure_ir`: extracted procedure IR documents
//!
//! Schemas are compiled once and held immutably. Validation is pure given the
//! loaded schemas and reports every issue with a JSON Pointer path.
//!
//! # Example
//!
//! ```rust,ignore
//! use planlint_schema::{SchemaId, SchemaRegistry};
//!
//! let registry = SchemaRegistry::shared()?;
//! let result = registry.validate(&document, SchemaId::ProcedureIr);
//! for issue in &result.errors {
//!     println!("{issue}");
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod issue;
pub mod registry;

pub use error::SchemaError;
pub use issue::{SchemaIssue, ValidationResult};
pub use registry::{
    validate_against_schema, SchemaId, SchemaOrigin, SchemaRegistry, SchemaRegistryBuilder,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
