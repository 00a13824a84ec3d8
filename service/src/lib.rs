//! # Metamodel Service
//!
//! Loads LinkML-style metamodel schemas and answers inheritance queries
//! against them.
//!
//! ## Overview
//!
//! A load runs in four stages:
//!
//! - **Import merging**: the root document and everything it imports are
//!   parsed and concatenated, depth-first
//! - **Extension application**: classes declaring `apply_to` are appended to
//!   their target's mixins
//! - **Ancestor linearization**: is-a and mixin chains flattened into one
//!   deduplicated order, with cycle detection
//! - **Attribute resolution**: the effective value of a slot attribute in a
//!   class context, searched across class and slot inheritance
//!
//! ## Quick Start
//!
//! ```rust
//! use metamodel_service::{AncestorQuery, InMemorySource, SchemaLoader};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = InMemorySource::new()
//!         .with_yaml("zoo", "name: zoo\nimports: [core]\nclasses:\n  Dog:\n    is_a: Animal\n")
//!         .with_yaml("core", "name: core\nclasses:\n  Animal:\n  Pet:\n    apply_to: Dog\n");
//!
//!     let view = SchemaLoader::new(source).load("zoo")?;
//!     let ancestors = view.class_ancestors("Dog", AncestorQuery::all())?;
//!     assert_eq!(ancestors, vec!["Dog", "Animal", "Pet"]);
//!     Ok(())
//! }
//! ```
//!
//! ## Diagnostics
//!
//! Nothing here prints. Unresolved references and validation problems are
//! emitted to a [`Diagnostics`] context and loading carries on; missing
//! imports and cycles are emitted and also returned as errors.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]

/// Reverse is-a extension application
pub mod extension;

/// Root loading and import merging
pub mod loader;

/// Document parsing
pub mod parser;

/// Resolution queries
pub mod schema_view;

/// Where imported documents come from
pub mod source;

/// Arena store of merged definitions
pub mod store;

pub use loader::SchemaLoader;
pub use metamodel_core::{Diagnostics, MetamodelConfig, MetamodelError, Result};
pub use parser::Parser;
pub use schema_view::{AncestorQuery, SchemaView};
pub use source::{DocumentFormat, FileSystemSource, ImportSource, InMemorySource, SchemaDocument};
pub use store::{ClassId, SchemaStore, SlotId, SlotRef, TypeId};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::loader::SchemaLoader;
    pub use crate::schema_view::{AncestorQuery, SchemaView};
    pub use crate::source::{FileSystemSource, ImportSource, InMemorySource, SchemaDocument};
    pub use metamodel_core::prelude::*;
}
