//! Slot attribute resolution priority

use metamodel_core::{MetamodelError, SchemaDefinition};
use metamodel_service::SchemaView;
use pretty_assertions::assert_eq;
use serde_json::json;

const BIOLINK: &str = r"
name: mini-biolink
types:
  string: {}
  iri_type: {}
slots:
  related_to:
    range: NamedThing
    multivalued: true
  interacts_with:
    is_a: related_to
  label:
    range: string
  identifier_slot:
    range: iri_type
    identifier: true
  tagged:
    mixins: [label]
classes:
  NamedThing:
    slots: [label]
  HasProvenance:
    slot_usage:
      label:
        range: ProvenanceLabel
  Gene:
    is_a: NamedThing
    mixins: [HasProvenance]
    slots: [interacts_with]
    slot_usage:
      interacts_with:
        range: Gene
        multivalued: false
  Protein:
    is_a: Gene
    slots: [tagged]
";

fn view() -> Result<SchemaView, Box<dyn std::error::Error>> {
    let schema: SchemaDefinition = serde_yaml::from_str(BIOLINK)?;
    Ok(SchemaView::new(schema))
}

#[test]
fn test_slot_usage_beats_everything_inherited() -> Result<(), Box<dyn std::error::Error>> {
    let view = view()?;

    // Gene's own usage beats the slot's is_a parent.
    assert_eq!(
        view.effective_range("Gene", "interacts_with")?,
        Some("Gene".to_string())
    );
    assert_eq!(
        view.resolve_attribute("Gene", "interacts_with", "multivalued")?,
        Some(json!(false))
    );
    assert!(!view.effective_multivalued("Gene", "interacts_with")?);
    Ok(())
}

#[test]
fn test_slot_declaration_beats_class_mixin_usage() -> Result<(), Box<dyn std::error::Error>> {
    let view = view()?;

    // `label` declares its own range, so HasProvenance's usage is never reached.
    assert_eq!(view.effective_range("Gene", "label")?, Some("string".to_string()));
    Ok(())
}

#[test]
fn test_slot_mixin_beats_class_isa() -> Result<(), Box<dyn std::error::Error>> {
    let view = view()?;

    // `tagged` declares nothing; Protein has no mixins of its own, the slot
    // mixin `label` is tried before the class is-a chain.
    assert_eq!(view.effective_range("Protein", "tagged")?, Some("string".to_string()));
    Ok(())
}

#[test]
fn test_class_isa_beats_slot_isa() -> Result<(), Box<dyn std::error::Error>> {
    let view = view()?;

    // Protein inherits Gene's usage before `interacts_with` falls back to
    // `related_to`.
    assert_eq!(
        view.effective_range("Protein", "interacts_with")?,
        Some("Gene".to_string())
    );
    // Without any usage in the chain the slot is-a parent answers.
    assert_eq!(
        view.effective_range("NamedThing", "interacts_with")?,
        Some("NamedThing".to_string())
    );
    assert!(view.effective_multivalued("NamedThing", "interacts_with")?);
    Ok(())
}

#[test]
fn test_default_when_nothing_declares() -> Result<(), Box<dyn std::error::Error>> {
    let view = view()?;

    assert_eq!(view.resolve_attribute("Protein", "label", "required")?, None);
    assert_eq!(
        view.class_slot_attribute("Protein", "label", "required", json!(false))?,
        json!(false)
    );
    assert_eq!(
        view.class_slot_attribute("Gene", "identifier_slot", "identifier", json!(false))?,
        json!(true)
    );
    Ok(())
}

#[test]
fn test_unknown_slot_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let view = view()?;

    assert!(matches!(
        view.resolve_attribute("Gene", "no_such_slot", "range"),
        Err(MetamodelError::UnknownElement { .. })
    ));
    Ok(())
}

#[test]
fn test_extra_attributes_resolve_too() -> Result<(), Box<dyn std::error::Error>> {
    let schema: SchemaDefinition = serde_yaml::from_str(
        r"
name: extra
slots:
  score:
    minimum_value: 0
classes:
  Bounded:
    slot_usage:
      score:
        minimum_value: 10
  Unbounded: {}
",
    )?;
    let view = SchemaView::new(schema);

    assert_eq!(
        view.resolve_attribute("Bounded", "score", "minimum_value")?,
        Some(json!(10))
    );
    assert_eq!(
        view.resolve_attribute("Unbounded", "score", "minimum_value")?,
        Some(json!(0))
    );
    Ok(())
}
