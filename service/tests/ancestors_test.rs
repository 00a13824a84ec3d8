//! Ancestor linearization over loaded schemas

use metamodel_core::{
    CollectingSink, Diagnostics, ElementKind, MetamodelError, SchemaDefinition,
    types::ClassDefinition,
};
use metamodel_service::{AncestorQuery, SchemaView};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

fn view(yaml: &str) -> Result<SchemaView, Box<dyn std::error::Error>> {
    let schema: SchemaDefinition = serde_yaml::from_str(yaml)?;
    Ok(SchemaView::new(schema))
}

const DIAMOND: &str = r"
name: diamond
classes:
  Entity: {}
  Named:
    is_a: Entity
  Dated:
    is_a: Entity
  Versioned:
    mixins: [Dated]
  Document:
    is_a: Named
    mixins: [Dated, Versioned]
";

#[test]
fn test_diamond_mixins_do_not_duplicate() -> Result<(), Box<dyn std::error::Error>> {
    let view = view(DIAMOND)?;

    assert_eq!(
        view.class_ancestors("Document", AncestorQuery::all())?,
        vec!["Document", "Named", "Entity", "Dated", "Versioned"]
    );
    Ok(())
}

#[test]
fn test_flag_combinations() -> Result<(), Box<dyn std::error::Error>> {
    let view = view(DIAMOND)?;
    let ancestors = |query| view.class_ancestors("Document", query);

    assert_eq!(ancestors(AncestorQuery::new())?, vec!["Document", "Named", "Entity"]);
    assert_eq!(
        ancestors(AncestorQuery::new().reflexive(false))?,
        vec!["Named", "Entity"]
    );
    assert_eq!(
        ancestors(AncestorQuery::all().use_isa(false))?,
        vec!["Document", "Dated", "Entity", "Versioned"]
    );
    assert_eq!(
        ancestors(AncestorQuery::new().use_isa(false))?,
        vec!["Document"]
    );
    let nothing = ancestors(AncestorQuery::new().use_isa(false).reflexive(false))?;
    assert!(nothing.is_empty());
    Ok(())
}

#[test]
fn test_isa_cycle_reports_full_path() -> Result<(), Box<dyn std::error::Error>> {
    let view = view(
        "name: loop\nclasses:\n  A:\n    is_a: B\n  B:\n    is_a: C\n  C:\n    is_a: A\n",
    )?;

    match view.class_ancestors("B", AncestorQuery::new()) {
        Err(MetamodelError::CycleDetected { kind, path }) => {
            assert_eq!(kind, ElementKind::Class);
            assert_eq!(path, vec!["B", "C", "A", "B"]);
        }
        other => panic!("Expected CycleDetected, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_slot_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let view = view("name: loop\nslots:\n  a:\n    mixins: [b]\n  b:\n    is_a: a\n")?;

    assert_eq!(
        view.ancestors_of(ElementKind::Slot, "a", AncestorQuery::new())?,
        vec!["a"]
    );
    assert!(matches!(
        view.ancestors_of(ElementKind::Slot, "a", AncestorQuery::all()),
        Err(MetamodelError::CycleDetected {
            kind: ElementKind::Slot,
            ..
        })
    ));
    Ok(())
}

#[test]
fn test_unresolved_mixin_warned_once_and_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let schema: SchemaDefinition = serde_yaml::from_str(
        r"
name: gaps
classes:
  A:
    mixins: [Ghost]
  B:
    is_a: A
    mixins: [Ghost]
",
    )?;
    let sink = Arc::new(CollectingSink::new());
    let view = SchemaView::with_diagnostics(schema, Diagnostics::new(sink.clone()));

    assert_eq!(view.class_ancestors("B", AncestorQuery::all())?, vec!["B", "A"]);
    assert_eq!(view.class_ancestors("A", AncestorQuery::all())?, vec!["A"]);
    assert_eq!(sink.with_code("unresolved-reference").len(), 1);
    assert_eq!(view.diagnostics().unresolved_names(), vec!["Ghost".to_string()]);
    Ok(())
}

/// An acyclic class graph: class `i` may only point at classes `< i`.
fn arb_acyclic_classes() -> impl Strategy<Value = Vec<ClassDefinition>> {
    (1usize..12).prop_flat_map(|size| {
        let edges: Vec<_> = (0..size)
            .map(|i| {
                let parent = if i == 0 {
                    Just(None).boxed()
                } else {
                    prop::option::of(0..i).boxed()
                };
                let mixins = if i == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    prop::collection::vec(0..i, 0..3).boxed()
                };
                (parent, mixins)
            })
            .collect();
        edges.prop_map(|edges| {
            edges
                .into_iter()
                .enumerate()
                .map(|(i, (parent, mixins))| {
                    let mut class = ClassDefinition::new(format!("C{i}"));
                    class.is_a = parent.map(|p| format!("C{p}"));
                    class.mixins = mixins.into_iter().map(|m| format!("C{m}")).collect();
                    class
                })
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn prop_reflexive_ancestors_contain_self_once(classes in arb_acyclic_classes()) {
        let names: Vec<String> = classes.iter().map(|c| c.name.clone()).collect();
        let mut schema = SchemaDefinition::new("generated");
        schema.classes = classes;
        let view = SchemaView::new(schema);

        for name in &names {
            let ancestors = view
                .class_ancestors(name, AncestorQuery::all())
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            prop_assert_eq!(ancestors.first(), Some(name));
            prop_assert_eq!(ancestors.iter().filter(|a| *a == name).count(), 1);
            let distinct: HashSet<&String> = ancestors.iter().collect();
            prop_assert_eq!(distinct.len(), ancestors.len());
        }
    }

    #[test]
    fn prop_non_reflexive_is_reflexive_minus_self(classes in arb_acyclic_classes()) {
        let names: Vec<String> = classes.iter().map(|c| c.name.clone()).collect();
        let mut schema = SchemaDefinition::new("generated");
        schema.classes = classes;
        let view = SchemaView::new(schema);

        for name in &names {
            let with_self = view
                .class_ancestors(name, AncestorQuery::all())
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let without_self = view
                .class_ancestors(name, AncestorQuery::all().reflexive(false))
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            prop_assert_eq!(&with_self[1..], &without_self[..]);
        }
    }
}
