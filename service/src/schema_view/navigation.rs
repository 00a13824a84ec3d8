//! Navigation queries built on ancestor linearization and attribute lookup

use indexmap::IndexSet;
use metamodel_core::{diagnostics::Diagnostics, error::Result};

use super::ancestors::{AncestorQuery, ClassGraph, linearize};
use super::attributes::AttributeResolver;
use crate::store::{ClassId, SchemaStore};

/// Classes whose `is_a` names `class`
#[must_use]
pub fn direct_children(store: &SchemaStore, class: ClassId) -> Vec<ClassId> {
    let name = &store.class(class).name;
    canonical_classes(store)
        .filter(|child| store.class(*child).is_a.as_ref() == Some(name))
        .collect()
}

/// Classes that list `class` among their mixins
#[must_use]
pub fn children_via_mixin(store: &SchemaStore, class: ClassId) -> Vec<ClassId> {
    let name = &store.class(class).name;
    canonical_classes(store)
        .filter(|child| store.class(*child).mixins.contains(name))
        .collect()
}

/// Ancestors of `class`, itself first
///
/// # Errors
///
/// Returns `CycleDetected` on a cyclic hierarchy.
pub fn class_ancestors(
    store: &SchemaStore,
    diagnostics: &Diagnostics,
    class: ClassId,
    query: AncestorQuery,
) -> Result<Vec<ClassId>> {
    linearize(&ClassGraph::new(store, diagnostics), class, query, &[])
}

/// Slot names applicable to `class`, in ancestor order, each once
///
/// # Errors
///
/// Returns `CycleDetected` on a cyclic hierarchy.
pub fn class_slots(
    store: &SchemaStore,
    diagnostics: &Diagnostics,
    class: ClassId,
    use_isa: bool,
    use_mixins: bool,
) -> Result<Vec<String>> {
    let query = AncestorQuery::new().use_isa(use_isa).use_mixins(use_mixins);
    let mut slots = IndexSet::new();
    for ancestor in class_ancestors(store, diagnostics, class, query)? {
        slots.extend(store.class(ancestor).slots.iter().cloned());
    }
    Ok(slots.into_iter().collect())
}

/// First ancestor of `class` (is-a and mixins, itself included) that lists
/// `slot` directly
///
/// # Errors
///
/// Returns `CycleDetected` on a cyclic hierarchy.
pub fn slot_inherited_from(
    store: &SchemaStore,
    diagnostics: &Diagnostics,
    class: ClassId,
    slot: &str,
) -> Result<Option<ClassId>> {
    let ancestors = class_ancestors(store, diagnostics, class, AncestorQuery::all())?;
    Ok(ancestors
        .into_iter()
        .find(|ancestor| store.class(*ancestor).slots.iter().any(|s| s == slot)))
}

/// The class through which `class` refers to `target`, if any.
///
/// A slot of `class` refers to `target` when its effective range is
/// `target` or a class with `target` among its ancestors. Ranges naming a
/// type are not class references.
///
/// # Errors
///
/// Returns `CycleDetected` on a cyclic hierarchy.
pub fn class_usage_of(
    store: &SchemaStore,
    diagnostics: &Diagnostics,
    class: ClassId,
    target: ClassId,
) -> Result<Option<ClassId>> {
    let target_name = &store.class(target).name;
    let resolver = AttributeResolver::new(store, diagnostics);

    for slot_name in class_slots(store, diagnostics, class, true, true)? {
        let Some(slot) = store.resolve_slot(&slot_name, Some(class), diagnostics) else {
            continue;
        };
        let Some(range) = resolver.range(class, slot)? else {
            continue;
        };
        if store.type_id(&range).is_some() {
            continue;
        }
        let Some(referenced) = store.resolve_class(&range, diagnostics) else {
            continue;
        };
        if &store.class(referenced).name == target_name {
            return Ok(Some(referenced));
        }
        let query = AncestorQuery::all().reflexive(false);
        let ancestors = class_ancestors(store, diagnostics, referenced, query)?;
        if ancestors
            .iter()
            .any(|ancestor| &store.class(*ancestor).name == target_name)
        {
            return Ok(Some(referenced));
        }
    }
    Ok(None)
}

/// Every `(using class, referenced class)` pair that refers to `target`
///
/// # Errors
///
/// Returns `CycleDetected` on a cyclic hierarchy.
pub fn all_usages_of(
    store: &SchemaStore,
    diagnostics: &Diagnostics,
    target: ClassId,
) -> Result<Vec<(ClassId, ClassId)>> {
    let mut pairs = Vec::new();
    for class in canonical_classes(store) {
        if let Some(referenced) = class_usage_of(store, diagnostics, class, target)? {
            pairs.push((class, referenced));
        }
    }
    Ok(pairs)
}

/// The definition each class name resolves to, in merged order
pub fn canonical_classes(store: &SchemaStore) -> impl Iterator<Item = ClassId> + '_ {
    store
        .class_ids()
        .filter(|id| store.class_id(&store.class(*id).name) == Some(*id))
}
