//! Resolution queries over a loaded schema
//!
//! Ancestor linearization, slot attribute lookup and the navigation
//! queries derived from them, behind the [`SchemaView`] facade.

pub mod ancestors;
pub mod attributes;
pub mod navigation;
pub mod view;

pub use ancestors::{AncestorQuery, ClassGraph, InheritanceGraph, SlotGraph, linearize};
pub use attributes::AttributeResolver;
pub use view::SchemaView;
