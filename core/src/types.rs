//! Core type definitions for metamodel schemas
//!
//! Collections are ordered vectors rather than maps: merging imports
//! concatenates them, and a merged schema may legitimately hold two
//! definitions with the same name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::named::{self, Named};

/// Schema definition - the root of a metamodel schema document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemaDefinition {
    /// Unique identifier for the schema
    #[serde(default)]
    pub id: String,

    /// Name of the schema
    #[serde(default)]
    pub name: String,

    /// Description of the schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Version of the schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Import statements, in load order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,

    /// Class definitions
    #[serde(
        default,
        deserialize_with = "named::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub classes: Vec<ClassDefinition>,

    /// Slot definitions
    #[serde(
        default,
        deserialize_with = "named::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub slots: Vec<SlotDefinition>,

    /// Type definitions
    #[serde(
        default,
        deserialize_with = "named::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub types: Vec<TypeDefinition>,
}

impl SchemaDefinition {
    /// Create an empty schema with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Class definition
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClassDefinition {
    /// Name of the class
    #[serde(default)]
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Is this class abstract?
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_: Option<bool>,

    /// Is this class intended only as a mixin?
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixin: Option<bool>,

    /// Parent class (single inheritance)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_a: Option<String>,

    /// Mixin classes, in priority order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mixins: Vec<String>,

    /// Class this class mixes itself into ("reverse is-a")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_to: Option<String>,

    /// Slots owned directly by this class
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<String>,

    /// Class-scoped slot overrides
    #[serde(
        default,
        deserialize_with = "named::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub slot_usage: Vec<SlotDefinition>,
}

impl ClassDefinition {
    /// Create a class with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Every `slot_usage` entry for the given slot name, in declared order
    pub fn slot_usages_for<'a>(
        &'a self,
        slot_name: &'a str,
    ) -> impl Iterator<Item = &'a SlotDefinition> + 'a {
        self.slot_usage.iter().filter(move |usage| usage.name == slot_name)
    }
}

/// Slot definition
///
/// Attributes the resolver does not model explicitly are kept in
/// [`SlotDefinition::extra`] so [`SlotDefinition::attribute`] can still
/// find them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SlotDefinition {
    /// Name of the slot
    #[serde(default)]
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parent slot (single inheritance)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_a: Option<String>,

    /// Mixin slots, in priority order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mixins: Vec<String>,

    /// Domain class of the slot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Range (type or class) of the slot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,

    /// Is this slot multivalued?
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multivalued: Option<bool>,

    /// Is this slot required?
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Is this slot an identifier?
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<bool>,

    /// Should values be inlined?
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inlined: Option<bool>,

    /// Slot URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_uri: Option<String>,

    /// Any other declared attribute
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl SlotDefinition {
    /// Create a slot with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Look up a declared attribute by name.
    ///
    /// Returns `None` only when the attribute is absent (or explicitly
    /// `null`). An explicit `false`, `0` or empty string is present.
    #[must_use]
    pub fn attribute(&self, attribute: &str) -> Option<Value> {
        fn text(value: Option<&String>) -> Option<Value> {
            value.map(|v| Value::String(v.clone()))
        }

        match attribute {
            "name" => Some(Value::String(self.name.clone())),
            "description" => text(self.description.as_ref()),
            "is_a" => text(self.is_a.as_ref()),
            "mixins" if self.mixins.is_empty() => None,
            "mixins" => Some(Value::Array(
                self.mixins.iter().cloned().map(Value::String).collect(),
            )),
            "domain" => text(self.domain.as_ref()),
            "range" => text(self.range.as_ref()),
            "multivalued" => self.multivalued.map(Value::Bool),
            "required" => self.required.map(Value::Bool),
            "identifier" => self.identifier.map(Value::Bool),
            "inlined" => self.inlined.map(Value::Bool),
            "slot_uri" => text(self.slot_uri.as_ref()),
            other => self.extra.get(other).filter(|v| !v.is_null()).cloned(),
        }
    }
}

/// Type definition. Merged with the schema but never traversed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TypeDefinition {
    /// Name of the type
    #[serde(default)]
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parent type
    #[serde(rename = "typeof", skip_serializing_if = "Option::is_none")]
    pub typeof_: Option<String>,

    /// Type URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Base type in the implementation language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    /// Representation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repr: Option<String>,

    /// Any other declared attribute
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl TypeDefinition {
    /// Create a type with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Named for ClassDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Named for SlotDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Named for TypeDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}
