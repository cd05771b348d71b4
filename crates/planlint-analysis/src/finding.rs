//! Per-step completeness verdict

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Completeness verdict for one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompletenessFinding {
    /// Id of the assessed step
    pub step_id: String,
    /// Normalized action type
    pub action: String,
    /// Source text of the step
    pub text: String,
    /// True iff no required parameter is missing
    pub is_complete: bool,
    /// Action type is not in the requirements table and was not assessed
    pub unrecognized_action: bool,
    /// Required parameters absent or blank, sorted
    pub missing_required: BTreeSet<String>,
    /// Recommended parameters absent or blank, sorted
    pub missing_recommended: BTreeSet<String>,
    /// Non-blank parameters, in document order
    pub parameters_provided: Vec<String>,
    /// Fraction of required parameters present
    pub coverage: f64,
}

impl CompletenessFinding {
    /// Number of missing required parameters
    #[inline]
    #[must_use]
    pub fn missing_required_count(&self) -> usize {
        self.missing_required.len()
    }

    /// Check whether any advisory detail is missing
    #[inline]
    #[must_use]
    pub fn has_advisories(&self) -> bool {
        !self.missing_recommended.is_empty()
    }
}
