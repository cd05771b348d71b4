//! Rejections produced by the validating gate
//!
//! Every variant can be flattened into the same `{path, message}` issue
//! list through [`ValidationError::issues`], so callers render any rejection
//! the same way.

use planlint_schema::SchemaIssue;
use serde::Serialize;

/// Pre-supplied step id used by more than one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateStepId {
    /// The repeated id
    pub id: String,
    /// 0-based positions of every step using it
    pub positions: Vec<usize>,
}

/// Parameter named twice within one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateParameter {
    /// 0-based step position
    pub step: usize,
    /// The repeated name
    pub name: String,
}

/// Candidate document rejected before analysis
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Document does not match the `procedure_ir` schema
    #[error("procedure failed schema validation with {} issue(s)", .0.len())]
    Schema(Vec<SchemaIssue>),

    /// Pre-supplied step ids are not unique
    #[error("duplicate step ids: {}", join_ids(.0))]
    DuplicateStepIds(Vec<DuplicateStepId>),

    /// A step names the same parameter twice
    #[error("{} duplicate parameter name(s) within steps", .0.len())]
    DuplicateParameters(Vec<DuplicateParameter>),

    /// Document passed the schema but could not be decoded
    #[error("procedure could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

fn join_ids(dups: &[DuplicateStepId]) -> String {
    dups.iter()
        .map(|d| format!("'{}'", d.id))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// Flatten into a pointer-addressed issue list
    #[must_use]
    pub fn issues(&self) -> Vec<SchemaIssue> {
        match self {
            Self::Schema(issues) => issues.clone(),
            Self::DuplicateStepIds(dups) => dups
                .iter()
                .flat_map(|dup| {
                    let first = dup.positions.first().copied().unwrap_or_default();
                    dup.positions.iter().skip(1).map(move |&pos| {
                        SchemaIssue::new(
                            format!("/steps/{pos}/id"),
                            format!(
                                "duplicate step id '{}' (already used by step {})",
                                dup.id,
                                first + 1
                            ),
                        )
                        .with_keyword("unique")
                    })
                })
                .collect(),
            Self::DuplicateParameters(dups) => dups
                .iter()
                .map(|dup| {
                    SchemaIssue::new(
                        format!("/steps/{}/parameters", dup.step),
                        format!("parameter '{}' given more than once", dup.name),
                    )
                    .with_keyword("unique")
                })
                .collect(),
            Self::Decode(e) => {
                vec![SchemaIssue::new("", format!("could not decode procedure: {e}")).with_keyword("decode")]
            }
        }
    }

    /// Number of individual issues
    #[inline]
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.issues().len()
    }
}
