//! Import sources
//!
//! The loader never touches the file system or network itself; it asks an
//! [`ImportSource`] for the document behind each import name.

use metamodel_core::config::ImportConfig;
use metamodel_core::error::{MetamodelError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Serialization format of a schema document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    /// YAML (the default)
    #[default]
    Yaml,
    /// JSON
    Json,
}

impl DocumentFormat {
    /// Guess the format from a path or import name, case-insensitively
    #[must_use]
    pub fn from_location(location: &str) -> Self {
        if location.to_lowercase().ends_with(".json") {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

/// Raw schema document handed to the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    /// Where the document came from (path, import name)
    pub location: String,
    /// Serialization format
    pub format: DocumentFormat,
    /// Document text
    pub content: String,
}

impl SchemaDocument {
    /// Create a document, guessing the format from `location`
    #[must_use]
    pub fn new(location: impl Into<String>, content: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            format: DocumentFormat::from_location(&location),
            location,
            content: content.into(),
        }
    }

    /// Create a YAML document
    #[must_use]
    pub fn yaml(location: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            format: DocumentFormat::Yaml,
            content: content.into(),
        }
    }

    /// Read a document from disk
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(path.display().to_string(), content))
    }
}

/// Resolves an import name to a schema document
pub trait ImportSource: Send + Sync {
    /// Fetch the document for `import`
    ///
    /// # Errors
    ///
    /// Returns `MissingImport` when the import cannot be found or read.
    fn fetch(&self, import: &str) -> Result<SchemaDocument>;
}

impl<F> ImportSource for F
where
    F: Fn(&str) -> Result<SchemaDocument> + Send + Sync,
{
    fn fetch(&self, import: &str) -> Result<SchemaDocument> {
        self(import)
    }
}

/// Resolves imports against directories on disk
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    search_paths: Vec<PathBuf>,
    extensions: Vec<String>,
}

impl Default for FileSystemSource {
    fn default() -> Self {
        Self::from_config(&ImportConfig::default())
    }
}

impl FileSystemSource {
    /// Source searching the given directories with the default extensions
    #[must_use]
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths,
            extensions: ImportConfig::default().extensions,
        }
    }

    /// Source built from import configuration
    #[must_use]
    pub fn from_config(config: &ImportConfig) -> Self {
        Self {
            search_paths: config.search_paths.clone(),
            extensions: config.extensions.clone(),
        }
    }

    /// Search `path` before the existing search paths
    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.insert(0, path.into());
        self
    }

    /// Configured search paths, in order
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    fn find(&self, import: &str) -> Option<PathBuf> {
        for base_path in &self.search_paths {
            let path = base_path.join(import);
            if path.is_file() {
                return Some(path);
            }

            for ext in &self.extensions {
                let path = base_path.join(format!("{import}.{ext}"));
                if path.is_file() {
                    return Some(path);
                }
            }
        }
        None
    }
}

impl ImportSource for FileSystemSource {
    fn fetch(&self, import: &str) -> Result<SchemaDocument> {
        let path = self.find(import).ok_or_else(|| {
            MetamodelError::import(
                import,
                format!("File not found in paths: {:?}", self.search_paths),
            )
        })?;
        tracing::debug!(import, path = %path.display(), "resolved import");

        let content = std::fs::read_to_string(&path)
            .map_err(|e| MetamodelError::import(import, format!("Failed to read file: {e}")))?;
        Ok(SchemaDocument::new(path.display().to_string(), content))
    }
}

/// Registry of documents held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    documents: HashMap<String, SchemaDocument>,
}

impl InMemorySource {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register YAML text under an import name
    #[must_use]
    pub fn with_yaml(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(SchemaDocument::yaml(name, content));
        self
    }

    /// Register a document under its location
    pub fn insert(&mut self, document: SchemaDocument) {
        self.documents.insert(document.location.clone(), document);
    }
}

impl ImportSource for InMemorySource {
    fn fetch(&self, import: &str) -> Result<SchemaDocument> {
        self.documents
            .get(import)
            .cloned()
            .ok_or_else(|| MetamodelError::import(import, "not registered"))
    }
}
