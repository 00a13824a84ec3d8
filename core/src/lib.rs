//! # Metamodel Core
//!
//! Core types for resolving LinkML-style metamodel schemas: class, slot and
//! type definitions, the error taxonomy, the diagnostics channel and
//! configuration. Loading and resolution live in `metamodel_service`.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Configuration for loading and resolution
pub mod config;

/// Diagnostics channel and sinks
pub mod diagnostics;

/// Core error types
pub mod error;

/// Mapping-or-sequence deserialization of named elements
pub mod named;

/// Schema, class, slot and type definitions
pub mod types;

// Re-export commonly used types
pub use config::MetamodelConfig;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, Diagnostics, TracingSink};
pub use error::{ElementKind, MetamodelError, Result};
pub use serde_json::Value;
pub use types::{ClassDefinition, SchemaDefinition, SlotDefinition, TypeDefinition};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::MetamodelConfig;
    pub use crate::diagnostics::{Diagnostic, DiagnosticSink, Diagnostics};
    pub use crate::error::{ElementKind, MetamodelError, Result};
    pub use crate::types::*;
}
