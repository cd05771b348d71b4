//! Error types for requirement tables

use std::path::PathBuf;

/// Errors while loading or merging a requirements table
#[derive(Debug, thiserror::Error)]
pub enum RequirementsError {
    /// Table file could not be read
    #[error("io error reading requirements {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Table document is not valid TOML for the expected layout
    #[error("requirements {origin} could not be parsed: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    /// Table declares no version
    #[error("requirements table has an empty version")]
    EmptyVersion,

    /// Action key is blank
    #[error("requirements table contains a blank action name")]
    BlankAction,

    /// Two keys name the same action once normalized
    #[error("requirements table lists action '{action}' more than once")]
    DuplicateAction { action: String },

    /// Parameter name is blank
    #[error("action '{action}' lists a blank parameter name")]
    BlankParameter { action: String },

    /// Parameter listed twice for one action
    #[error("action '{action}' lists parameter '{parameter}' more than once")]
    DuplicateParameter { action: String, parameter: String },

    /// Parameter is both required and recommended
    #[error("action '{action}' lists {parameters:?} as both required and recommended")]
    Overlap {
        action: String,
        parameters: Vec<String>,
    },
}

impl RequirementsError {
    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create parse error for a table origin
    pub fn parse(origin: impl Into<String>, source: toml::de::Error) -> Self {
        Self::Parse {
            origin: origin.into(),
            source,
        }
    }
}
