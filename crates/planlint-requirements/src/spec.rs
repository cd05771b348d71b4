//! Requirement entry for a single action type

use crate::error::RequirementsError;
use serde::Serialize;
use std::collections::BTreeSet;

/// Normalize an action name for table lookup
///
/// Surrounding whitespace is dropped and the name is lower-cased, so
/// `" Fix "` and `"fix"` address the same entry.
#[must_use]
pub fn normalize_action(action: &str) -> String {
    action.trim().to_lowercase()
}

/// Required and recommended parameter names for one action type
///
/// The two sets never overlap; construction rejects entries that would
/// list a parameter under both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRequirementSpec {
    action: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    required: BTreeSet<String>,
    recommended: BTreeSet<String>,
}

impl ActionRequirementSpec {
    /// Create an entry, checking names and disjointness
    ///
    /// # Errors
    /// Returns error if the action or a parameter name is blank, a name is
    /// repeated within one list, or a name appears in both lists
    pub fn new<R, C>(action: &str, required: R, recommended: C) -> Result<Self, RequirementsError>
    where
        R: IntoIterator,
        R::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let action = normalize_action(action);
        if action.is_empty() {
            return Err(RequirementsError::BlankAction);
        }

        let required = collect_names(&action, required)?;
        let recommended = collect_names(&action, recommended)?;

        let overlap: Vec<String> = required.intersection(&recommended).cloned().collect();
        if !overlap.is_empty() {
            return Err(RequirementsError::Overlap {
                action,
                parameters: overlap,
            });
        }

        Ok(Self {
            action,
            description: String::new(),
            required,
            recommended,
        })
    }

    /// With human-readable description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Normalized action name
    #[inline]
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Description, empty when none was given
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameters whose absence makes a step incomplete
    #[inline]
    #[must_use]
    pub fn required(&self) -> &BTreeSet<String> {
        &self.required
    }

    /// Parameters whose absence is advisory only
    #[inline]
    #[must_use]
    pub fn recommended(&self) -> &BTreeSet<String> {
        &self.recommended
    }

    /// Check whether a parameter is required
    #[inline]
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }
}

fn collect_names<I>(action: &str, names: I) -> Result<BTreeSet<String>, RequirementsError>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut out = BTreeSet::new();
    for name in names {
        let name: String = name.into();
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(RequirementsError::BlankParameter {
                action: action.to_string(),
            });
        }
        if !out.insert(name.clone()) {
            return Err(RequirementsError::DuplicateParameter {
                action: action.to_string(),
                parameter: name,
            });
        }
    }
    Ok(out)
}
