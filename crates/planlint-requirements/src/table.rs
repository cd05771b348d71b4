//! Versioned requirements table
//!
//! The table is plain data loaded from TOML. Adding an action type means
//! adding an `[actions.<name>]` entry; nothing in the analyzer changes.

use crate::error::RequirementsError;
use crate::spec::{normalize_action, ActionRequirementSpec};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

const BUILTIN: &str = include_str!("../data/action_requirements.toml");

/// Result of looking up an action type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Table has an entry for the action
    Found(&'a ActionRequirementSpec),
    /// Action type is not modelled
    NotFound,
}

impl<'a> Lookup<'a> {
    /// Check whether an entry was found
    #[inline]
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Entry, if found
    #[inline]
    #[must_use]
    pub fn spec(self) -> Option<&'a ActionRequirementSpec> {
        match self {
            Self::Found(spec) => Some(spec),
            Self::NotFound => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableDocument {
    version: String,
    #[serde(default)]
    actions: BTreeMap<String, EntryDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntryDocument {
    #[serde(default)]
    description: String,
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    recommended: Vec<String>,
}

/// Immutable mapping from action type to its requirement entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementsTable {
    version: String,
    actions: BTreeMap<String, ActionRequirementSpec>,
}

static SHARED: OnceCell<Arc<RequirementsTable>> = OnceCell::new();

impl RequirementsTable {
    /// Build table from entries
    ///
    /// A later entry for the same action type replaces an earlier one.
    ///
    /// # Errors
    /// Returns error if the version is blank
    pub fn from_specs(
        version: impl Into<String>,
        specs: impl IntoIterator<Item = ActionRequirementSpec>,
    ) -> Result<Self, RequirementsError> {
        let version = version.into().trim().to_string();
        if version.is_empty() {
            return Err(RequirementsError::EmptyVersion);
        }
        let actions = specs
            .into_iter()
            .map(|spec| (spec.action().to_string(), spec))
            .collect();
        Ok(Self { version, actions })
    }

    /// Parse table from TOML text
    ///
    /// # Errors
    /// Returns error if the text is not a valid table document, any entry
    /// is malformed, or two keys name the same action once normalized
    pub fn from_toml_str(text: &str) -> Result<Self, RequirementsError> {
        Self::parse(text, "<inline>")
    }

    /// Load table from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, RequirementsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| RequirementsError::io(path, e))?;
        let table = Self::parse(&text, &path.display().to_string())?;
        tracing::info!(
            path = %path.display(),
            actions = table.len(),
            version = %table.version,
            "loaded requirements table"
        );
        Ok(table)
    }

    fn parse(text: &str, origin: &str) -> Result<Self, RequirementsError> {
        let document: TableDocument =
            toml::from_str(text).map_err(|e| RequirementsError::parse(origin, e))?;

        let mut seen = BTreeSet::new();
        let mut specs = Vec::with_capacity(document.actions.len());
        for (action, entry) in document.actions {
            let spec = ActionRequirementSpec::new(&action, entry.required, entry.recommended)?
                .with_description(entry.description);
            if !seen.insert(spec.action().to_string()) {
                return Err(RequirementsError::DuplicateAction {
                    action: spec.action().to_string(),
                });
            }
            specs.push(spec);
        }

        Self::from_specs(document.version, specs)
    }

    /// Table compiled into the crate
    ///
    /// # Errors
    /// Returns error if the embedded data is malformed
    pub fn builtin() -> Result<Self, RequirementsError> {
        let table = Self::parse(BUILTIN, "builtin")?;
        tracing::info!(
            actions = table.len(),
            version = %table.version,
            "loaded builtin requirements table"
        );
        Ok(table)
    }

    /// Process-wide builtin table
    ///
    /// # Errors
    /// Returns error if the embedded data is malformed
    pub fn shared() -> Result<Arc<Self>, RequirementsError> {
        SHARED
            .get_or_try_init(|| Self::builtin().map(Arc::new))
            .map(Arc::clone)
    }

    /// Overlay another table; its entries replace same-named ones
    ///
    /// The merged version records both sources as `base+overlay`.
    #[must_use]
    pub fn merge(mut self, other: RequirementsTable) -> Self {
        self.version = format!("{}+{}", self.version, other.version);
        self.actions.extend(other.actions);
        self
    }

    /// Look up the entry for an action type
    ///
    /// The action is normalized first, so lookups ignore case and
    /// surrounding whitespace.
    #[must_use]
    pub fn get(&self, action: &str) -> Lookup<'_> {
        let key = normalize_action(action);
        match self.actions.get(&key) {
            Some(spec) => Lookup::Found(spec),
            None => Lookup::NotFound,
        }
    }

    /// Check whether the action type is modelled
    #[inline]
    #[must_use]
    pub fn contains(&self, action: &str) -> bool {
        self.get(action).is_found()
    }

    /// Modelled action types, sorted
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Entries, sorted by action type
    pub fn specs(&self) -> impl Iterator<Item = &ActionRequirementSpec> {
        self.actions.values()
    }

    /// Description of an action type
    #[must_use]
    pub fn description(&self, action: &str) -> Option<&str> {
        self.get(action).spec().map(ActionRequirementSpec::description)
    }

    /// Number of modelled action types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if the table has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Table version stamped into reports
    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}
