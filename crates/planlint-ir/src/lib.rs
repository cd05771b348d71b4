//! # Planlint IR
//!
//! The structured procedure model and the gate that produces it.
//!
//! Extractor output is untyped and may be malformed. [`validate_procedure`]
//! turns it into a [`Procedure`] or a [`ValidationError`]; nothing reaches
//! analysis any other way.
//!
//! ```
//! use planlint_ir::ProcedureValidator;
//! use serde_json::json;
//!
//! let validator = ProcedureValidator::shared().unwrap();
//! let procedure = validator
//!     .validate(&json!({
//!         "citation": "Smith 2023",
//!         "steps": [{"action": "incubate", "parameters": {"duration_min": 30, "temperature": "37C"}}]
//!     }))
//!     .unwrap();
//! assert_eq!(procedure.steps()[0].id().as_str(), "step_1");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod builder;
pub mod error;
pub mod model;
mod normalize;
mod raw;
pub mod validator;

pub use builder::{ProcedureBuilder, StepBuilder};
pub use error::{DuplicateParameter, DuplicateStepId, ValidationError};
pub use model::{ParamValue, Parameter, Procedure, Source, Step, StepId, SCHEMA_VERSION};
pub use validator::{validate_procedure, ProcedureValidator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
