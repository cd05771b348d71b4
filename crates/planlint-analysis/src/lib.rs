//! # Planlint Analysis
//!
//! Diffs a validated [`Procedure`](planlint_ir::Procedure) against the
//! requirements table and reports, per step and in aggregate, whether it
//! states enough detail to be replicated.
//!
//! ## Completeness rules
//!
//! - A required parameter is missing when it is absent, null, or blank text.
//!   Zero and `false` are values.
//! - A step is complete iff no required parameter is missing. Missing
//!   recommended parameters are advisory only.
//! - A step whose action type is not in the table is complete, flagged
//!   `unrecognized_action`, and counted in `unrecognized_steps`.
//! - An empty procedure scores 1.0 and sets `no_content`.
//!
//! ```
//! use planlint_analysis::analyze;
//! use planlint_ir::{Procedure, StepBuilder};
//! use planlint_requirements::RequirementsTable;
//!
//! let table = RequirementsTable::builtin().unwrap();
//! let procedure = Procedure::builder()
//!     .step(StepBuilder::new("centrifuge").param("speed", "").param("duration_min", 10))
//!     .build()
//!     .unwrap();
//!
//! let report = analyze(&procedure, &table);
//! assert!(report.findings[0].missing_required.contains("speed"));
//! assert_eq!(report.incomplete_steps, 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod analyzer;
pub mod finding;
pub mod render;
pub mod report;

pub use analyzer::{analyze, assess_step, Analyzer};
pub use finding::CompletenessFinding;
pub use render::{
    render_issues_text, render_json, render_json_string, render_text, report_schema, TextOptions,
};
pub use report::CompletenessReport;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
