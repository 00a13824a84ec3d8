//! Error types for metamodel loading and resolution

use std::fmt;
use thiserror::Error;

/// The two node kinds that carry inheritance edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Class definition
    Class,
    /// Slot definition
    Slot,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => f.write_str("class"),
            Self::Slot => f.write_str("slot"),
        }
    }
}

/// Main error type for metamodel operations
#[derive(Error, Debug)]
pub enum MetamodelError {
    /// The document is not well-formed YAML or JSON
    #[error("Failed to parse schema: {message}")]
    ParseError {
        /// Error message
        message: String,
        /// Location in the document if available
        location: Option<String>,
    },

    /// An import could not be fetched
    #[error("Failed to resolve import '{import}': {reason}")]
    MissingImport {
        /// Import that failed
        import: String,
        /// Reason for failure
        reason: String,
    },

    /// An import is already being loaded further up the import path
    #[error("Circular import detected: {}", path.join(" -> "))]
    ImportCycle {
        /// Import path ending at the repeated import
        path: Vec<String>,
    },

    /// Import nesting went deeper than configured
    #[error("Maximum import depth ({max_depth}) exceeded while importing '{import}'")]
    ImportDepthExceeded {
        /// Import that would exceed the limit
        import: String,
        /// Configured limit
        max_depth: usize,
    },

    /// Ancestor or attribute traversal revisited a node on the current path
    #[error("Cycle detected in {kind} hierarchy: {}", path.join(" -> "))]
    CycleDetected {
        /// Kind of node the cycle runs through
        kind: ElementKind,
        /// Path from the query node to the revisited node
        path: Vec<String>,
    },

    /// A query entry point was given a name that does not resolve
    #[error("No such {kind}: {name}")]
    UnknownElement {
        /// Kind that was looked up
        kind: ElementKind,
        /// Name that was looked up
        name: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type alias for metamodel operations
pub type Result<T> = std::result::Result<T, MetamodelError>;

impl MetamodelError {
    /// Create a new parse error
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: None,
        }
    }

    /// Create a new parse error with location
    #[must_use]
    pub fn parse_at(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: Some(location.into()),
        }
    }

    /// Create a new missing-import error
    #[must_use]
    pub fn import(import: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MissingImport {
            import: import.into(),
            reason: reason.into(),
        }
    }

    /// Create a new cycle error
    #[must_use]
    pub fn cycle(kind: ElementKind, path: Vec<String>) -> Self {
        Self::CycleDetected { kind, path }
    }

    /// Create an unknown-element error
    #[must_use]
    pub fn unknown(kind: ElementKind, name: impl Into<String>) -> Self {
        Self::UnknownElement {
            kind,
            name: name.into(),
        }
    }

    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Whether this error aborts a whole schema load rather than a single query
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ParseError { .. }
                | Self::MissingImport { .. }
                | Self::ImportCycle { .. }
                | Self::ImportDepthExceeded { .. }
                | Self::IoError(_)
        )
    }
}

impl From<serde_json::Error> for MetamodelError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for MetamodelError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
