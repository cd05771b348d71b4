//! # Planlint Core
//!
//! The calling layer around the analysis engine: configuration, schema and
//! table loading, extractor-response parsing, and the [`Planlint`] facade
//! that runs the gate and the analyzer.
//!
//! ```
//! use planlint_core::Planlint;
//! use serde_json::json;
//!
//! let planlint = Planlint::with_defaults().unwrap();
//! let report = planlint
//!     .check(&json!({"steps": [{"action": "wash", "parameters": {"buffer": "PBS"}}]}))
//!     .unwrap();
//! assert_eq!(report.incomplete_steps, 1);
//! assert!(report.findings[0].missing_required.contains("wash_steps"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod extraction;
pub mod pipeline;
pub mod plan;

pub use config::{
    ConfigError, LoggingConfig, PlanlintConfig, ReportConfig, RequirementsConfig, SchemaConfig,
};
pub use error::PlanlintError;
pub use extraction::{parse_llm_response, ExtractionError};
pub use pipeline::Planlint;
pub use plan::{validate_plan, PlanValidation};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
