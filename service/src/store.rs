//! Schema store: the merged schema held as an arena of definitions
//!
//! Cross-references stay as names inside the definitions, but every name is
//! looked up through a `name -> index` map built once after merging.
//! Duplicated names (from concatenated imports) keep every definition in the
//! arena; the map points at the first one in merged order.

use metamodel_core::{
    diagnostics::Diagnostics,
    error::ElementKind,
    types::{ClassDefinition, SchemaDefinition, SlotDefinition, TypeDefinition},
};
use std::collections::HashMap;

/// Handle of a class definition in a [`SchemaStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

/// Handle of a global slot definition in a [`SchemaStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(usize);

/// Handle of a type definition in a [`SchemaStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl ClassId {
    /// Position in the merged class collection
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl SlotId {
    /// Position in the merged slot collection
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl TypeId {
    /// Position in the merged type collection
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Reference to a slot definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRef {
    /// A slot from the schema's slot collection
    Global(SlotId),
    /// A slot that exists only as a `slot_usage` entry of a class
    Local {
        /// Class holding the entry
        class: ClassId,
        /// Position in that class's `slot_usage`
        index: usize,
    },
}

/// The merged schema
#[derive(Debug, Clone, Default)]
pub struct SchemaStore {
    id: String,
    name: String,
    imports: Vec<String>,
    classes: Vec<ClassDefinition>,
    slots: Vec<SlotDefinition>,
    types: Vec<TypeDefinition>,
    class_index: HashMap<String, ClassId>,
    slot_index: HashMap<String, SlotId>,
    type_index: HashMap<String, TypeId>,
}

impl SchemaStore {
    /// Build the store from a merged schema
    #[must_use]
    pub fn from_schema(schema: SchemaDefinition) -> Self {
        let SchemaDefinition {
            id,
            name,
            imports,
            classes,
            slots,
            types,
            ..
        } = schema;

        let mut class_index = HashMap::with_capacity(classes.len());
        for (position, class) in classes.iter().enumerate() {
            class_index
                .entry(class.name.clone())
                .or_insert(ClassId(position));
        }
        let mut slot_index = HashMap::with_capacity(slots.len());
        for (position, slot) in slots.iter().enumerate() {
            slot_index.entry(slot.name.clone()).or_insert(SlotId(position));
        }
        let mut type_index = HashMap::with_capacity(types.len());
        for (position, ty) in types.iter().enumerate() {
            type_index.entry(ty.name.clone()).or_insert(TypeId(position));
        }

        Self {
            id,
            name,
            imports,
            classes,
            slots,
            types,
            class_index,
            slot_index,
            type_index,
        }
    }

    /// Schema name of the root document
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema id of the root document
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Imports declared by the root document
    #[must_use]
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Every class definition in merged order, duplicates included
    #[must_use]
    pub fn classes(&self) -> &[ClassDefinition] {
        &self.classes
    }

    /// Every global slot definition in merged order, duplicates included
    #[must_use]
    pub fn slots(&self) -> &[SlotDefinition] {
        &self.slots
    }

    /// Every type definition in merged order, duplicates included
    #[must_use]
    pub fn types(&self) -> &[TypeDefinition] {
        &self.types
    }

    /// Handles of every class definition in merged order
    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.classes.len()).map(ClassId)
    }

    /// Class definition behind a handle
    #[must_use]
    pub fn class(&self, id: ClassId) -> &ClassDefinition {
        &self.classes[id.0]
    }

    /// Slot definition behind a reference
    #[must_use]
    pub fn slot(&self, slot: SlotRef) -> &SlotDefinition {
        match slot {
            SlotRef::Global(id) => &self.slots[id.0],
            SlotRef::Local { class, index } => &self.classes[class.0].slot_usage[index],
        }
    }

    /// Type definition behind a handle
    #[must_use]
    pub fn type_def(&self, id: TypeId) -> &TypeDefinition {
        &self.types[id.0]
    }

    pub(crate) fn class_mut(&mut self, id: ClassId) -> &mut ClassDefinition {
        &mut self.classes[id.0]
    }

    /// Exact-name class lookup, without diagnostics
    #[must_use]
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.class_index.get(name).copied()
    }

    /// Exact-name global slot lookup, without diagnostics
    #[must_use]
    pub fn slot_id(&self, name: &str) -> Option<SlotId> {
        self.slot_index.get(name).copied()
    }

    /// Exact-name type lookup
    #[must_use]
    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.type_index.get(name).copied()
    }

    /// Slot lookup: the global collection first, then `class`'s `slot_usage`
    #[must_use]
    pub fn find_slot(&self, name: &str, class: Option<ClassId>) -> Option<SlotRef> {
        if let Some(id) = self.slot_id(name) {
            return Some(SlotRef::Global(id));
        }
        let class = class?;
        self.classes[class.0]
            .slot_usage
            .iter()
            .position(|usage| usage.name == name)
            .map(|index| SlotRef::Local { class, index })
    }

    /// Class lookup that reports an unresolved name once
    #[must_use]
    pub fn resolve_class(&self, name: &str, diagnostics: &Diagnostics) -> Option<ClassId> {
        let found = self.class_id(name);
        if found.is_none() {
            diagnostics.warn_unresolved(ElementKind::Class, name, None);
        }
        found
    }

    /// Slot lookup that reports an unresolved name once
    #[must_use]
    pub fn resolve_slot(
        &self,
        name: &str,
        class: Option<ClassId>,
        diagnostics: &Diagnostics,
    ) -> Option<SlotRef> {
        let found = self.find_slot(name, class);
        if found.is_none() {
            let context = class.map(|id| self.classes[id.0].name.as_str());
            diagnostics.warn_unresolved(ElementKind::Slot, name, context);
        }
        found
    }

    /// Names defined more than once, with how many definitions each has
    #[must_use]
    pub fn duplicates(&self) -> Vec<(ElementKind, String, usize)> {
        fn count<'a>(
            kind: ElementKind,
            names: impl Iterator<Item = &'a str>,
            out: &mut Vec<(ElementKind, String, usize)>,
        ) {
            let mut counts: indexmap::IndexMap<&str, usize> = indexmap::IndexMap::new();
            for name in names {
                *counts.entry(name).or_default() += 1;
            }
            out.extend(
                counts
                    .into_iter()
                    .filter(|(_, n)| *n > 1)
                    .map(|(name, n)| (kind, name.to_string(), n)),
            );
        }

        let mut out = Vec::new();
        count(ElementKind::Class, self.classes.iter().map(|c| c.name.as_str()), &mut out);
        count(ElementKind::Slot, self.slots.iter().map(|s| s.name.as_str()), &mut out);
        out
    }
}
