//! Main `SchemaView` API for resolved schema queries

use metamodel_core::{
    Value,
    diagnostics::{Diagnostic, Diagnostics},
    error::{ElementKind, MetamodelError, Result},
    types::{ClassDefinition, SchemaDefinition, SlotDefinition, TypeDefinition},
};
use std::sync::Arc;

use super::ancestors::{AncestorQuery, SlotGraph, linearize};
use super::attributes::AttributeResolver;
use super::navigation;
use crate::extension::apply_extensions;
use crate::store::{ClassId, SchemaStore, SlotRef};

/// Read-only query surface over a merged, extended schema
///
/// Every query recomputes from the store; nothing is cached between calls.
/// Name-based queries report unknown names through the diagnostics channel
/// and then fail with `UnknownElement`. Cycles fail with `CycleDetected` and
/// are reported as fatal diagnostics as well.
#[derive(Clone, Debug)]
pub struct SchemaView {
    store: Arc<SchemaStore>,
    diagnostics: Diagnostics,
}

impl SchemaView {
    /// View over an already merged schema, with extensions applied
    #[must_use]
    pub fn new(schema: SchemaDefinition) -> Self {
        Self::with_diagnostics(schema, Diagnostics::default())
    }

    /// As [`SchemaView::new`], reporting to `diagnostics`
    #[must_use]
    pub fn with_diagnostics(schema: SchemaDefinition, diagnostics: Diagnostics) -> Self {
        let mut store = SchemaStore::from_schema(schema);
        apply_extensions(&mut store, &diagnostics);
        Self::from_store(store, diagnostics)
    }

    pub(crate) fn from_store(store: SchemaStore, diagnostics: Diagnostics) -> Self {
        Self {
            store: Arc::new(store),
            diagnostics,
        }
    }

    /// The underlying store
    #[must_use]
    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    /// The diagnostics channel queries report to
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Name of the root schema
    #[must_use]
    pub fn name(&self) -> &str {
        self.store.name()
    }

    // Lookups

    /// Class definition by exact name
    #[must_use]
    pub fn class_by_name(&self, name: &str) -> Option<&ClassDefinition> {
        self.store
            .resolve_class(name, &self.diagnostics)
            .map(|id| self.store.class(id))
    }

    /// Slot definition by exact name, falling back to `class`'s `slot_usage`
    #[must_use]
    pub fn slot_by_name(&self, name: &str, class: Option<&str>) -> Option<&SlotDefinition> {
        let context = class.and_then(|class| self.store.class_id(class));
        self.store
            .resolve_slot(name, context, &self.diagnostics)
            .map(|slot| self.store.slot(slot))
    }

    /// Type definition by exact name
    #[must_use]
    pub fn type_by_name(&self, name: &str) -> Option<&TypeDefinition> {
        self.store.type_id(name).map(|id| self.store.type_def(id))
    }

    /// One definition per class name, in merged order
    #[must_use]
    pub fn all_classes(&self) -> Vec<&ClassDefinition> {
        navigation::canonical_classes(&self.store)
            .map(|id| self.store.class(id))
            .collect()
    }

    /// One definition per global slot name, in merged order
    #[must_use]
    pub fn all_slots(&self) -> Vec<&SlotDefinition> {
        self.store
            .slots()
            .iter()
            .enumerate()
            .filter(|(position, slot)| {
                self.store.slot_id(&slot.name).map(|id| id.index()) == Some(*position)
            })
            .map(|(_, slot)| slot)
            .collect()
    }

    /// One definition per type name, in merged order
    #[must_use]
    pub fn all_types(&self) -> Vec<&TypeDefinition> {
        self.store
            .types()
            .iter()
            .enumerate()
            .filter(|(position, ty)| {
                self.store.type_id(&ty.name).map(|id| id.index()) == Some(*position)
            })
            .map(|(_, ty)| ty)
            .collect()
    }

    // Ancestors

    /// Linearized ancestors of a class
    ///
    /// # Errors
    ///
    /// Returns `UnknownElement` if `class` does not resolve and
    /// `CycleDetected` if its hierarchy is cyclic.
    pub fn class_ancestors(&self, class: &str, query: AncestorQuery) -> Result<Vec<String>> {
        let id = self.require_class(class)?;
        let ancestors = self.report(navigation::class_ancestors(
            &self.store,
            &self.diagnostics,
            id,
            query,
        ))?;
        Ok(self.class_names(&ancestors))
    }

    /// Linearized ancestors of a slot, optionally seen from a class
    ///
    /// # Errors
    ///
    /// Returns `UnknownElement` if `slot` (or `class`) does not resolve and
    /// `CycleDetected` if the slot hierarchy is cyclic.
    pub fn slot_ancestors(
        &self,
        slot: &str,
        class: Option<&str>,
        query: AncestorQuery,
    ) -> Result<Vec<String>> {
        let context = class.map(|class| self.require_class(class)).transpose()?;
        let start = self.require_slot(slot, context)?;
        let graph = SlotGraph::new(&self.store, &self.diagnostics, context);
        let ancestors = self.report(linearize(&graph, start, query, &[]))?;
        Ok(ancestors
            .into_iter()
            .map(|slot| self.store.slot(slot).name.clone())
            .collect())
    }

    /// Ancestors of a class or a global slot
    ///
    /// # Errors
    ///
    /// As for [`SchemaView::class_ancestors`] and [`SchemaView::slot_ancestors`].
    pub fn ancestors_of(
        &self,
        kind: ElementKind,
        name: &str,
        query: AncestorQuery,
    ) -> Result<Vec<String>> {
        match kind {
            ElementKind::Class => self.class_ancestors(name, query),
            ElementKind::Slot => self.slot_ancestors(name, None, query),
        }
    }

    // Attributes

    /// Effective value of `attribute` for `slot` used in `class`
    ///
    /// `None` means no class or slot on any inheritance axis declares it.
    ///
    /// # Errors
    ///
    /// Returns `UnknownElement` if `class` or `slot` does not resolve and
    /// `CycleDetected` if the search loops.
    pub fn resolve_attribute(
        &self,
        class: &str,
        slot: &str,
        attribute: &str,
    ) -> Result<Option<Value>> {
        let (class, slot) = self.require_pair(class, slot)?;
        self.report(self.resolver().resolve(class, slot, attribute))
    }

    /// [`SchemaView::resolve_attribute`] with a fallback value
    ///
    /// # Errors
    ///
    /// As for [`SchemaView::resolve_attribute`].
    pub fn class_slot_attribute(
        &self,
        class: &str,
        slot: &str,
        attribute: &str,
        default: Value,
    ) -> Result<Value> {
        Ok(self
            .resolve_attribute(class, slot, attribute)?
            .unwrap_or(default))
    }

    /// Effective range of `slot` in `class`
    ///
    /// # Errors
    ///
    /// As for [`SchemaView::resolve_attribute`].
    pub fn effective_range(&self, class: &str, slot: &str) -> Result<Option<String>> {
        let (class, slot) = self.require_pair(class, slot)?;
        self.report(self.resolver().range(class, slot))
    }

    /// Whether `slot` is multivalued in `class`; `false` unless declared
    ///
    /// # Errors
    ///
    /// As for [`SchemaView::resolve_attribute`].
    pub fn effective_multivalued(&self, class: &str, slot: &str) -> Result<bool> {
        let (class, slot) = self.require_pair(class, slot)?;
        self.report(self.resolver().multivalued(class, slot))
    }

    // Navigation

    /// Classes declaring `class` as their is-a parent
    ///
    /// # Errors
    ///
    /// Returns `UnknownElement` if `class` does not resolve.
    pub fn direct_children(&self, class: &str) -> Result<Vec<String>> {
        let id = self.require_class(class)?;
        Ok(self.class_names(&navigation::direct_children(&self.store, id)))
    }

    /// Classes listing `class` as a mixin, including applied extensions
    ///
    /// # Errors
    ///
    /// Returns `UnknownElement` if `class` does not resolve.
    pub fn children_via_mixin(&self, class: &str) -> Result<Vec<String>> {
        let id = self.require_class(class)?;
        Ok(self.class_names(&navigation::children_via_mixin(&self.store, id)))
    }

    /// Slot names applicable to `class`
    ///
    /// # Errors
    ///
    /// Returns `UnknownElement` if `class` does not resolve and
    /// `CycleDetected` on a cyclic hierarchy.
    pub fn class_slots(&self, class: &str, use_isa: bool, use_mixins: bool) -> Result<Vec<String>> {
        let id = self.require_class(class)?;
        self.report(navigation::class_slots(
            &self.store,
            &self.diagnostics,
            id,
            use_isa,
            use_mixins,
        ))
    }

    /// The nearest class, `class` included, that lists `slot` directly
    ///
    /// # Errors
    ///
    /// Returns `UnknownElement` if `class` does not resolve and
    /// `CycleDetected` on a cyclic hierarchy.
    pub fn slot_inherited_from(&self, class: &str, slot: &str) -> Result<Option<String>> {
        let id = self.require_class(class)?;
        let found = self.report(navigation::slot_inherited_from(
            &self.store,
            &self.diagnostics,
            id,
            slot,
        ))?;
        Ok(found.map(|id| self.store.class(id).name.clone()))
    }

    /// The class through which `class` refers to `target`
    ///
    /// # Errors
    ///
    /// Returns `UnknownElement` if either class does not resolve and
    /// `CycleDetected` on a cyclic hierarchy.
    pub fn class_usage_of(&self, class: &str, target: &str) -> Result<Option<String>> {
        let class = self.require_class(class)?;
        let target = self.require_class(target)?;
        let found = self.report(navigation::class_usage_of(
            &self.store,
            &self.diagnostics,
            class,
            target,
        ))?;
        Ok(found.map(|id| self.store.class(id).name.clone()))
    }

    /// `(using class, referenced class)` for every class that refers to
    /// `target`
    ///
    /// # Errors
    ///
    /// Returns `UnknownElement` if `target` does not resolve and
    /// `CycleDetected` on a cyclic hierarchy.
    pub fn all_usages_of(&self, target: &str) -> Result<Vec<(String, String)>> {
        let target = self.require_class(target)?;
        let pairs = self.report(navigation::all_usages_of(
            &self.store,
            &self.diagnostics,
            target,
        ))?;
        Ok(pairs
            .into_iter()
            .map(|(user, referenced)| {
                (
                    self.store.class(user).name.clone(),
                    self.store.class(referenced).name.clone(),
                )
            })
            .collect())
    }

    fn resolver(&self) -> AttributeResolver<'_> {
        AttributeResolver::new(&self.store, &self.diagnostics)
    }

    fn class_names(&self, ids: &[ClassId]) -> Vec<String> {
        ids.iter()
            .map(|id| self.store.class(*id).name.clone())
            .collect()
    }

    fn require_class(&self, name: &str) -> Result<ClassId> {
        self.store
            .resolve_class(name, &self.diagnostics)
            .ok_or_else(|| MetamodelError::unknown(ElementKind::Class, name))
    }

    fn require_slot(&self, name: &str, class: Option<ClassId>) -> Result<SlotRef> {
        self.store
            .resolve_slot(name, class, &self.diagnostics)
            .ok_or_else(|| MetamodelError::unknown(ElementKind::Slot, name))
    }

    fn require_pair(&self, class: &str, slot: &str) -> Result<(ClassId, SlotRef)> {
        let class = self.require_class(class)?;
        let slot = self.require_slot(slot, Some(class))?;
        Ok((class, slot))
    }

    fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(MetamodelError::CycleDetected { kind, path }) = &result {
            self.diagnostics.emit(Diagnostic::CycleDetected {
                kind: *kind,
                path: path.clone(),
            });
        }
        result
    }
}
