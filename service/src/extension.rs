//! Reverse is-a ("apply_to") application
//!
//! Runs once on the fully merged store, before it is frozen.

use metamodel_core::diagnostics::Diagnostics;

use crate::store::SchemaStore;

/// Append every class that declares `apply_to` to its target's mixins.
///
/// Classes are visited in merged declaration order, so several classes
/// applied to the same target become mixins in that order. Targets that do
/// not resolve are skipped; the lookup has already reported them.
///
/// Returns the number of extensions applied.
pub fn apply_extensions(store: &mut SchemaStore, diagnostics: &Diagnostics) -> usize {
    let pending: Vec<(String, String)> = store
        .classes()
        .iter()
        .filter_map(|class| {
            class
                .apply_to
                .as_ref()
                .filter(|target| !target.is_empty())
                .map(|target| (class.name.clone(), target.clone()))
        })
        .collect();

    let mut applied = 0;
    for (class_name, target_name) in pending {
        let Some(target) = store.resolve_class(&target_name, diagnostics) else {
            continue;
        };
        tracing::info!("Applying '{class_name}' to '{target_name}'");
        store.class_mut(target).mixins.push(class_name);
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use metamodel_core::types::{ClassDefinition, SchemaDefinition};

    fn class_applied_to(name: &str, target: &str) -> ClassDefinition {
        let mut class = ClassDefinition::new(name);
        class.apply_to = Some(target.to_string());
        class
    }

    #[test]
    fn test_apply_appends_in_declaration_order() {
        let mut schema = SchemaDefinition::new("test");
        let mut target = ClassDefinition::new("Target");
        target.mixins = vec!["Existing".to_string()];
        schema.classes.push(class_applied_to("First", "Target"));
        schema.classes.push(target);
        schema.classes.push(class_applied_to("Second", "Target"));
        schema.classes.push(ClassDefinition::new("Existing"));

        let mut store = SchemaStore::from_schema(schema);
        let applied = apply_extensions(&mut store, &Diagnostics::default());

        assert_eq!(applied, 2);
        let target = store.class_id("Target").map(|id| store.class(id).mixins.clone());
        assert_eq!(
            target,
            Some(vec![
                "Existing".to_string(),
                "First".to_string(),
                "Second".to_string()
            ])
        );
    }

    #[test]
    fn test_unresolved_target_is_skipped() {
        let mut schema = SchemaDefinition::new("test");
        schema.classes.push(class_applied_to("Orphan", "Nowhere"));

        let mut store = SchemaStore::from_schema(schema);
        assert_eq!(apply_extensions(&mut store, &Diagnostics::default()), 0);
    }
}
