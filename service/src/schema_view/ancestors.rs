//! Ancestor linearization over the is-a and mixin axes
//!
//! The linearization of a node is: the node itself (if reflexive), then the
//! reflexive linearization of its is-a parent, then that of each mixin in
//! declared order, deduplicated by name keeping the first occurrence.
//! Nested expansions always include the parent's own is-a chain; the
//! caller's `use_isa` flag applies to the starting node only.

use metamodel_core::{
    diagnostics::Diagnostics,
    error::{ElementKind, MetamodelError, Result},
};
use std::collections::HashSet;

use crate::store::{ClassId, SchemaStore, SlotRef};

/// Which edges an ancestor query follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AncestorQuery {
    /// Follow `is_a`
    pub use_isa: bool,
    /// Follow `mixins`
    pub use_mixins: bool,
    /// Include the starting node
    pub reflexive: bool,
}

impl Default for AncestorQuery {
    fn default() -> Self {
        Self {
            use_isa: true,
            use_mixins: false,
            reflexive: true,
        }
    }
}

impl AncestorQuery {
    /// is-a chain only, starting node included
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// is-a chain and mixins, starting node included
    #[must_use]
    pub fn all() -> Self {
        Self {
            use_mixins: true,
            ..Self::default()
        }
    }

    /// Set whether `is_a` is followed
    #[must_use]
    pub const fn use_isa(mut self, use_isa: bool) -> Self {
        self.use_isa = use_isa;
        self
    }

    /// Set whether `mixins` are followed
    #[must_use]
    pub const fn use_mixins(mut self, use_mixins: bool) -> Self {
        self.use_mixins = use_mixins;
        self
    }

    /// Set whether the starting node is included
    #[must_use]
    pub const fn reflexive(mut self, reflexive: bool) -> Self {
        self.reflexive = reflexive;
        self
    }

    const fn nested(self) -> Self {
        Self {
            use_isa: true,
            use_mixins: self.use_mixins,
            reflexive: true,
        }
    }
}

/// A graph with single-parent and mixin edges between named nodes
pub trait InheritanceGraph {
    /// Node handle
    type Node: Copy;

    /// Kind reported in cycle errors
    const KIND: ElementKind;

    /// Name of a node
    fn name(&self, node: Self::Node) -> &str;

    /// Resolved is-a parent; unresolved names yield `None`
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Resolved mixins in declared order; unresolved names are skipped
    fn mixins(&self, node: Self::Node) -> Vec<Self::Node>;
}

/// Linearize the ancestors of `node`.
///
/// `path` holds the names on the current recursion branch. Each branch
/// gets its own copy, so reaching a node through two sibling edges is not
/// a cycle; reaching a node that is already on the branch is.
///
/// # Errors
///
/// Returns `CycleDetected` with the full path when a node is revisited.
pub fn linearize<G: InheritanceGraph>(
    graph: &G,
    node: G::Node,
    query: AncestorQuery,
    path: &[String],
) -> Result<Vec<G::Node>> {
    let name = graph.name(node);
    if path.iter().any(|visited| visited == name) {
        let mut cycle = path.to_vec();
        cycle.push(name.to_string());
        return Err(MetamodelError::cycle(G::KIND, cycle));
    }

    let mut branch = path.to_vec();
    branch.push(name.to_string());

    let mut ancestors = Vec::new();
    if query.reflexive {
        ancestors.push(node);
    }
    if query.use_isa
        && let Some(parent) = graph.parent(node)
    {
        ancestors.extend(linearize(graph, parent, query.nested(), &branch)?);
    }
    if query.use_mixins {
        for mixin in graph.mixins(node) {
            ancestors.extend(linearize(graph, mixin, query.nested(), &branch)?);
        }
    }

    let mut seen = HashSet::new();
    ancestors.retain(|ancestor| seen.insert(graph.name(*ancestor).to_string()));
    Ok(ancestors)
}

/// Class hierarchy of a store
pub struct ClassGraph<'a> {
    store: &'a SchemaStore,
    diagnostics: &'a Diagnostics,
}

impl<'a> ClassGraph<'a> {
    /// View the store's classes as a graph
    #[must_use]
    pub fn new(store: &'a SchemaStore, diagnostics: &'a Diagnostics) -> Self {
        Self { store, diagnostics }
    }
}

impl InheritanceGraph for ClassGraph<'_> {
    type Node = ClassId;

    const KIND: ElementKind = ElementKind::Class;

    fn name(&self, node: ClassId) -> &str {
        &self.store.class(node).name
    }

    fn parent(&self, node: ClassId) -> Option<ClassId> {
        let parent = self.store.class(node).is_a.as_deref()?;
        self.store.resolve_class(parent, self.diagnostics)
    }

    fn mixins(&self, node: ClassId) -> Vec<ClassId> {
        self.store
            .class(node)
            .mixins
            .iter()
            .filter_map(|mixin| self.store.resolve_class(mixin, self.diagnostics))
            .collect()
    }
}

/// Slot hierarchy of a store, optionally seen from one class
///
/// With a class context, names missing from the global slot collection
/// fall back to that class's `slot_usage` entries.
pub struct SlotGraph<'a> {
    store: &'a SchemaStore,
    diagnostics: &'a Diagnostics,
    context: Option<ClassId>,
}

impl<'a> SlotGraph<'a> {
    /// View the store's slots as a graph
    #[must_use]
    pub fn new(
        store: &'a SchemaStore,
        diagnostics: &'a Diagnostics,
        context: Option<ClassId>,
    ) -> Self {
        Self {
            store,
            diagnostics,
            context,
        }
    }
}

impl InheritanceGraph for SlotGraph<'_> {
    type Node = SlotRef;

    const KIND: ElementKind = ElementKind::Slot;

    fn name(&self, node: SlotRef) -> &str {
        &self.store.slot(node).name
    }

    fn parent(&self, node: SlotRef) -> Option<SlotRef> {
        let parent = self.store.slot(node).is_a.as_deref()?;
        self.store.resolve_slot(parent, self.context, self.diagnostics)
    }

    fn mixins(&self, node: SlotRef) -> Vec<SlotRef> {
        self.store
            .slot(node)
            .mixins
            .iter()
            .filter_map(|mixin| self.store.resolve_slot(mixin, self.context, self.diagnostics))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metamodel_core::types::{ClassDefinition, SchemaDefinition, SlotDefinition};
    use pretty_assertions::assert_eq;

    fn class(name: &str, is_a: Option<&str>, mixins: &[&str]) -> ClassDefinition {
        let mut class = ClassDefinition::new(name);
        class.is_a = is_a.map(str::to_string);
        class.mixins = mixins.iter().map(|m| (*m).to_string()).collect();
        class
    }

    fn store(classes: Vec<ClassDefinition>) -> SchemaStore {
        let mut schema = SchemaDefinition::new("test");
        schema.classes = classes;
        SchemaStore::from_schema(schema)
    }

    fn names(store: &SchemaStore, ids: &[ClassId]) -> Vec<String> {
        ids.iter().map(|id| store.class(*id).name.clone()).collect()
    }

    fn ancestors(store: &SchemaStore, name: &str, query: AncestorQuery) -> Result<Vec<String>> {
        let diagnostics = Diagnostics::default();
        let graph = ClassGraph::new(store, &diagnostics);
        let id = store.class_id(name).expect("class in fixture");
        Ok(names(store, &linearize(&graph, id, query, &[])?))
    }

    #[test]
    fn test_isa_then_mixins_order() -> Result<()> {
        let store = store(vec![
            class("Thing", None, &[]),
            class("Animal", Some("Thing"), &[]),
            class("Pet", None, &[]),
            class("Dog", Some("Animal"), &["Pet"]),
        ]);

        assert_eq!(
            ancestors(&store, "Dog", AncestorQuery::all())?,
            vec!["Dog", "Animal", "Thing", "Pet"]
        );
        assert_eq!(
            ancestors(&store, "Dog", AncestorQuery::new())?,
            vec!["Dog", "Animal", "Thing"]
        );
        assert_eq!(
            ancestors(&store, "Dog", AncestorQuery::all().reflexive(false))?,
            vec!["Animal", "Thing", "Pet"]
        );
        Ok(())
    }

    #[test]
    fn test_diamond_keeps_first_occurrence() -> Result<()> {
        let store = store(vec![
            class("A", None, &[]),
            class("B", Some("A"), &[]),
            class("C", Some("A"), &[]),
            class("D", Some("B"), &["C"]),
        ]);

        assert_eq!(
            ancestors(&store, "D", AncestorQuery::all())?,
            vec!["D", "B", "A", "C"]
        );
        Ok(())
    }

    #[test]
    fn test_mixins_only_still_expands_mixin_isa() -> Result<()> {
        let store = store(vec![
            class("Base", None, &[]),
            class("Named", Some("Base"), &[]),
            class("Parent", None, &[]),
            class("Thing", Some("Parent"), &["Named"]),
        ]);

        assert_eq!(
            ancestors(&store, "Thing", AncestorQuery::all().use_isa(false))?,
            vec!["Thing", "Named", "Base"]
        );
        Ok(())
    }

    #[test]
    fn test_no_axes_no_self_is_empty() -> Result<()> {
        let store = store(vec![class("A", None, &[])]);
        let query = AncestorQuery::new().use_isa(false).reflexive(false);
        assert!(ancestors(&store, "A", query)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_isa_cycle_is_error() {
        let store = store(vec![class("A", Some("B"), &[]), class("B", Some("A"), &[])]);

        match ancestors(&store, "A", AncestorQuery::new()) {
            Err(MetamodelError::CycleDetected { kind, path }) => {
                assert_eq!(kind, ElementKind::Class);
                assert_eq!(path, vec!["A", "B", "A"]);
            }
            other => panic!("Expected CycleDetected, got {other:?}"),
        }
    }

    #[test]
    fn test_mixin_cycle_only_when_following_mixins() -> Result<()> {
        let store = store(vec![class("A", None, &["B"]), class("B", None, &["A"])]);

        assert_eq!(ancestors(&store, "A", AncestorQuery::new())?, vec!["A"]);
        assert!(matches!(
            ancestors(&store, "A", AncestorQuery::all()),
            Err(MetamodelError::CycleDetected { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_unresolved_parent_is_skipped() -> Result<()> {
        let store = store(vec![class("Orphan", Some("Missing"), &["AlsoMissing"])]);
        assert_eq!(
            ancestors(&store, "Orphan", AncestorQuery::all())?,
            vec!["Orphan"]
        );
        Ok(())
    }

    #[test]
    fn test_slot_ancestors_with_local_parent() -> Result<()> {
        let mut schema = SchemaDefinition::new("test");
        let mut related = SlotDefinition::new("related_to");
        related.is_a = Some("association_slot".to_string());
        schema.slots.push(related);
        let mut person = ClassDefinition::new("Person");
        person.slot_usage.push(SlotDefinition::new("association_slot"));
        schema.classes.push(person);
        let store = SchemaStore::from_schema(schema);
        let diagnostics = Diagnostics::default();

        let start = store.find_slot("related_to", None).expect("slot in fixture");
        let graph = SlotGraph::new(&store, &diagnostics, store.class_id("Person"));
        let found: Vec<String> = linearize(&graph, start, AncestorQuery::new(), &[])?
            .into_iter()
            .map(|slot| store.slot(slot).name.clone())
            .collect();

        assert_eq!(found, vec!["related_to", "association_slot"]);
        Ok(())
    }
}
