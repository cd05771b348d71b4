//! Aggregate completeness report

use crate::finding::CompletenessFinding;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Completeness of a whole procedure
///
/// Findings keep the original step order. An empty procedure has
/// `total_steps == 0`, `overall_score == 1.0` and `no_content == true`,
/// which tells it apart from a procedure whose steps are all complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompletenessReport {
    /// Number of steps
    pub total_steps: usize,
    /// Steps with no missing required parameter
    pub complete_steps: usize,
    /// Steps missing at least one required parameter
    pub incomplete_steps: usize,
    /// `complete_steps / total_steps`, or 1.0 with no steps
    pub overall_score: f64,
    /// Procedure had no steps to assess
    pub no_content: bool,
    /// Steps whose action type was not assessed
    pub unrecognized_steps: usize,
    /// Sum of missing required parameters over all steps
    pub total_missing_required: usize,
    /// Sum of missing recommended parameters over all steps
    pub total_missing_recommended: usize,
    /// One finding per step, in step order
    pub findings: Vec<CompletenessFinding>,
    /// Citation of the analyzed procedure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    /// Version of the requirements table used
    pub requirements_version: String,
    /// BLAKE3 digest of the analyzed procedure
    pub procedure_digest: String,
}

impl CompletenessReport {
    /// Check whether every step is complete
    ///
    /// True for the empty procedure; check [`no_content`](Self::no_content)
    /// to distinguish the two.
    #[inline]
    #[must_use]
    pub fn is_fully_complete(&self) -> bool {
        self.incomplete_steps == 0
    }

    /// Finding for a step id
    #[must_use]
    pub fn finding(&self, step_id: &str) -> Option<&CompletenessFinding> {
        self.findings.iter().find(|f| f.step_id == step_id)
    }

    /// Incomplete findings, in step order
    pub fn incomplete(&self) -> impl Iterator<Item = &CompletenessFinding> {
        self.findings.iter().filter(|f| !f.is_complete)
    }

    /// Incomplete findings ordered by missing required count, most first
    ///
    /// Ties keep step order. At most `limit` findings are returned.
    #[must_use]
    pub fn needing_attention(&self, limit: usize) -> Vec<&CompletenessFinding> {
        let mut incomplete: Vec<&CompletenessFinding> = self.incomplete().collect();
        incomplete.sort_by(|a, b| b.missing_required_count().cmp(&a.missing_required_count()));
        incomplete.truncate(limit);
        incomplete
    }
}
