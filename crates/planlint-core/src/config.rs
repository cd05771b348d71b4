//! Planlint configuration
//!
//! Loaded from TOML by the calling layer. Every field has a default, so an
//! empty file (or no file) is a valid configuration. Relative paths in a
//! configuration file are resolved against the file's directory.

use planlint_analysis::TextOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("io error reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid TOML for the expected layout
    #[error("config could not be parsed: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Where schema documents come from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Directory holding both schema files under their standard names
    pub dir: Option<PathBuf>,
    /// Explicit experiment plan schema file
    pub experiment_plan: Option<PathBuf>,
    /// Explicit procedure IR schema file
    pub procedure_ir: Option<PathBuf>,
}

impl SchemaConfig {
    /// Check whether only the embedded schemas are used
    #[inline]
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.dir.is_none() && self.experiment_plan.is_none() && self.procedure_ir.is_none()
    }
}

/// Requirements table sources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequirementsConfig {
    /// Table files merged over the builtin table, in order
    pub extra: Vec<PathBuf>,
}

/// Text report settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Maximum steps in the attention list
    pub attention_limit: usize,
    /// Maximum characters of step text shown
    pub text_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let options = TextOptions::default();
        Self {
            attention_limit: options.attention_limit,
            text_width: options.text_width,
        }
    }
}

/// Logging settings, applied by the binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Planlint configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanlintConfig {
    /// Schema sources
    pub schemas: SchemaConfig,
    /// Requirements table sources
    pub requirements: RequirementsConfig,
    /// Text report settings
    pub report: ReportConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl PlanlintConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns error if the text does not parse or a value is invalid
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, does not parse, or a value
    /// is invalid
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_relative(base);
        }
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    fn resolve_relative(&mut self, base: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.schemas.dir.iter_mut().for_each(rebase);
        self.schemas.experiment_plan.iter_mut().for_each(rebase);
        self.schemas.procedure_ir.iter_mut().for_each(rebase);
        self.requirements.extra.iter_mut().for_each(rebase);
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns the first invalid field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.text_width == 0 {
            return Err(ConfigError::Invalid {
                field: "report.text_width",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "logging.level",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// With schema directory
    #[inline]
    #[must_use]
    pub fn with_schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schemas.dir = Some(dir.into());
        self
    }

    /// With an extra requirements table file
    #[inline]
    #[must_use]
    pub fn with_requirements_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.requirements.extra.push(path.into());
        self
    }

    /// With attention list limit
    #[inline]
    #[must_use]
    pub fn with_attention_limit(mut self, limit: usize) -> Self {
        self.report.attention_limit = limit;
        self
    }

    /// With step text width
    #[inline]
    #[must_use]
    pub fn with_text_width(mut self, width: usize) -> Self {
        self.report.text_width = width;
        self
    }

    /// With log level
    #[inline]
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    /// With JSON log output
    #[inline]
    #[must_use]
    pub fn with_log_json(mut self, json: bool) -> Self {
        self.logging.json = json;
        self
    }

    /// Text renderer options
    #[must_use]
    pub fn text_options(&self) -> TextOptions {
        TextOptions::default()
            .with_attention_limit(self.report.attention_limit)
            .with_text_width(self.report.text_width)
    }
}
