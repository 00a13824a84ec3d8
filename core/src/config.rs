//! Configuration types for schema loading and resolution

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MetamodelError, Result};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MetamodelConfig {
    /// Import loading configuration
    pub imports: ImportConfig,

    /// Resolution configuration
    pub resolution: ResolutionConfig,
}

/// Import loading configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImportConfig {
    /// Base directories for import resolution, tried in order
    pub search_paths: Vec<PathBuf>,

    /// File extensions tried after the bare import name
    pub extensions: Vec<String>,

    /// Whether to follow imports at all
    pub follow_imports: bool,

    /// Maximum import nesting depth
    pub max_import_depth: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from(".")],
            extensions: vec!["yaml".to_string(), "yml".to_string(), "json".to_string()],
            follow_imports: true,
            max_import_depth: 32,
        }
    }
}

/// Resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Report structural validation findings for loaded documents
    pub validate_documents: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            validate_documents: true,
        }
    }
}

impl MetamodelConfig {
    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is not valid configuration YAML
    /// or fails [`MetamodelConfig::validate`].
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| MetamodelError::config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read, or `ConfigError` if
    /// its content is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Check value constraints
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `max_import_depth` is zero or no file
    /// extensions are configured.
    pub fn validate(&self) -> Result<()> {
        if self.imports.max_import_depth == 0 {
            return Err(MetamodelError::config(
                "imports.max_import_depth must be at least 1",
            ));
        }
        if self.imports.extensions.is_empty() {
            return Err(MetamodelError::config(
                "imports.extensions must list at least one extension",
            ));
        }
        Ok(())
    }

    /// Add a search path ahead of the configured ones
    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.imports.search_paths.insert(0, path.into());
        self
    }
}
