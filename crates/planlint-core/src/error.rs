//! Error types for the planlint pipeline

use crate::config::ConfigError;
use crate::extraction::ExtractionError;
use planlint_ir::ValidationError;
use planlint_requirements::RequirementsError;
use planlint_schema::SchemaError;
use std::path::PathBuf;

/// Main planlint error type
#[derive(Debug, thiserror::Error)]
pub enum PlanlintError {
    /// Schema documents failed to load
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Requirements table failed to load
    #[error("requirements error: {0}")]
    Requirements(#[from] RequirementsError),

    /// Configuration is unreadable or invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Extractor response could not be turned into a document
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Procedure rejected by the validating gate
    #[error("procedure rejected: {0}")]
    Validation(#[from] ValidationError),

    /// File could not be read or written
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlanlintError {
    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if the input was rejected, as opposed to a setup failure
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Extraction(_))
    }

    /// Validation error, if this is a gate rejection
    #[inline]
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}
