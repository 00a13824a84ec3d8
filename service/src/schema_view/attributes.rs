//! Slot attribute lookup across class and slot inheritance
//!
//! Unlike ancestor linearization this is a lazy first-hit search. For a
//! `(class, slot)` pair the order is:
//!
//! 1. the class's `slot_usage` entry for the slot
//! 2. the slot's own declaration
//! 3. each class mixin, in declared order
//! 4. each slot mixin, in declared order
//! 5. the class's is-a parent
//! 6. the slot's is-a parent
//!
//! An attribute counts as present whenever it is declared, so an explicit
//! `false` stops the search.

use metamodel_core::{
    Value,
    diagnostics::Diagnostics,
    error::{ElementKind, MetamodelError, Result},
};

use crate::store::{ClassId, SchemaStore, SlotRef};

/// First-hit attribute search over one store
pub struct AttributeResolver<'a> {
    store: &'a SchemaStore,
    diagnostics: &'a Diagnostics,
}

impl<'a> AttributeResolver<'a> {
    /// Resolver over `store`, reporting unresolved names to `diagnostics`
    #[must_use]
    pub fn new(store: &'a SchemaStore, diagnostics: &'a Diagnostics) -> Self {
        Self { store, diagnostics }
    }

    /// Effective value of `attribute` for `slot` used in `class`, or `None`
    /// if no step declares it.
    ///
    /// # Errors
    ///
    /// Returns `CycleDetected` if the search comes back to a `(class, slot)`
    /// pair it is already expanding.
    pub fn resolve(
        &self,
        class: ClassId,
        slot: SlotRef,
        attribute: &str,
    ) -> Result<Option<Value>> {
        self.search(class, slot, attribute, &[])
    }

    /// Effective range of `slot` in `class`
    ///
    /// # Errors
    ///
    /// As for [`AttributeResolver::resolve`].
    pub fn range(&self, class: ClassId, slot: SlotRef) -> Result<Option<String>> {
        Ok(self
            .resolve(class, slot, "range")?
            .and_then(|value| value.as_str().map(str::to_string)))
    }

    /// Whether `slot` is multivalued in `class`; `false` when undeclared
    ///
    /// # Errors
    ///
    /// As for [`AttributeResolver::resolve`].
    pub fn multivalued(&self, class: ClassId, slot: SlotRef) -> Result<bool> {
        Ok(self
            .resolve(class, slot, "multivalued")?
            .and_then(|value| value.as_bool())
            .unwrap_or(false))
    }

    fn search(
        &self,
        class: ClassId,
        slot: SlotRef,
        attribute: &str,
        path: &[(ClassId, SlotRef)],
    ) -> Result<Option<Value>> {
        if path.contains(&(class, slot)) {
            return Err(self.cycle(path, (class, slot)));
        }
        let mut branch = path.to_vec();
        branch.push((class, slot));

        let class_def = self.store.class(class);
        let slot_def = self.store.slot(slot);

        if let Some(value) = class_def
            .slot_usages_for(&slot_def.name)
            .find_map(|usage| usage.attribute(attribute))
        {
            return Ok(Some(value));
        }

        if let Some(value) = slot_def.attribute(attribute) {
            return Ok(Some(value));
        }

        for mixin in &class_def.mixins {
            if let Some(mixin) = self.store.resolve_class(mixin, self.diagnostics)
                && let Some(value) = self.search(mixin, slot, attribute, &branch)?
            {
                return Ok(Some(value));
            }
        }

        for mixin in &slot_def.mixins {
            if let Some(mixin) = self.store.resolve_slot(mixin, Some(class), self.diagnostics)
                && let Some(value) = self.search(class, mixin, attribute, &branch)?
            {
                return Ok(Some(value));
            }
        }

        if let Some(parent) = class_def.is_a.as_deref()
            && let Some(parent) = self.store.resolve_class(parent, self.diagnostics)
            && let Some(value) = self.search(parent, slot, attribute, &branch)?
        {
            return Ok(Some(value));
        }

        if let Some(parent) = slot_def.is_a.as_deref()
            && let Some(parent) = self.store.resolve_slot(parent, Some(class), self.diagnostics)
            && let Some(value) = self.search(class, parent, attribute, &branch)?
        {
            return Ok(Some(value));
        }

        Ok(None)
    }

    fn cycle(&self, path: &[(ClassId, SlotRef)], repeated: (ClassId, SlotRef)) -> MetamodelError {
        // The step that closed the loop tells which hierarchy it runs through.
        let kind = match path.last() {
            Some((class, _)) if *class == repeated.0 => ElementKind::Slot,
            _ => ElementKind::Class,
        };
        let path = path
            .iter()
            .chain(std::iter::once(&repeated))
            .map(|(class, slot)| {
                format!("{}.{}", self.store.class(*class).name, self.store.slot(*slot).name)
            })
            .collect();
        MetamodelError::cycle(kind, path)
    }
}
