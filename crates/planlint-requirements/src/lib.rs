//! # Planlint Requirements
//!
//! Declarative reproducibility knowledge: for each experimental action type,
//! the parameters a step must state (`required`) and the ones it should
//! state (`recommended`).
//!
//! The table ships as TOML data compiled into the crate and can be extended
//! or overridden at startup with additional table files.
//!
//! ```
//! use planlint_requirements::{Lookup, RequirementsTable};
//!
//! let table = RequirementsTable::builtin().unwrap();
//! match table.get("centrifuge") {
//!     Lookup::Found(spec) => assert!(spec.is_required("speed")),
//!     Lookup::NotFound => unreachable!(),
//! }
//! assert_eq!(table.get("unknown_xyz"), Lookup::NotFound);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod spec;
pub mod table;

pub use error::RequirementsError;
pub use spec::{normalize_action, ActionRequirementSpec};
pub use table::{Lookup, RequirementsTable};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
