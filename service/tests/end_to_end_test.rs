//! Load, extend and query a small schema end to end

use metamodel_core::{CollectingSink, Diagnostics};
use metamodel_service::{AncestorQuery, FileSystemSource, InMemorySource, SchemaLoader};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;

const ANIMALS: &str = r"
id: https://example.org/animals
name: animals
imports:
  - pets
slots:
  name:
    range: string
  owner:
    range: Person
classes:
  Animal:
    slots:
      - name
  Dog:
    is_a: Animal
  Person:
    slots:
      - name
";

const PETS: &str = r"
name: pets
classes:
  Pet:
    mixin: true
    apply_to: Dog
    slots:
      - owner
";

fn animals_dir() -> std::io::Result<TempDir> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("animals.yaml"), ANIMALS)?;
    fs::write(dir.path().join("pets.yaml"), PETS)?;
    Ok(dir)
}

#[test]
fn test_apply_to_becomes_mixin() -> Result<(), Box<dyn std::error::Error>> {
    let dir = animals_dir()?;
    let sink = Arc::new(CollectingSink::new());
    let view = SchemaLoader::new(FileSystemSource::new(vec![dir.path().to_path_buf()]))
        .with_diagnostics(Diagnostics::new(sink.clone()))
        .load("animals")?;

    let dog = view.class_by_name("Dog").ok_or("Dog missing")?;
    assert_eq!(dog.mixins, vec!["Pet".to_string()]);
    assert_eq!(
        view.class_ancestors("Dog", AncestorQuery::all())?,
        vec!["Dog", "Animal", "Pet"]
    );
    assert_eq!(view.class_ancestors("Dog", AncestorQuery::new())?, vec!["Dog", "Animal"]);
    assert_eq!(view.children_via_mixin("Pet")?, vec!["Dog"]);
    assert_eq!(view.direct_children("Animal")?, vec!["Dog"]);

    assert!(sink.is_empty(), "unexpected diagnostics: {:?}", sink.entries());
    Ok(())
}

#[test]
fn test_full_fallback_returns_default() -> Result<(), Box<dyn std::error::Error>> {
    let dir = animals_dir()?;
    let view = SchemaLoader::new(FileSystemSource::new(vec![dir.path().to_path_buf()]))
        .load("animals")?;

    assert!(!view.effective_multivalued("Dog", "name")?);
    assert_eq!(
        view.class_slot_attribute("Dog", "name", "multivalued", json!(false))?,
        json!(false)
    );
    assert_eq!(view.effective_range("Dog", "name")?, Some("string".to_string()));
    Ok(())
}

#[test]
fn test_slots_and_usages_across_extension() -> Result<(), Box<dyn std::error::Error>> {
    let dir = animals_dir()?;
    let view = SchemaLoader::new(FileSystemSource::new(vec![dir.path().to_path_buf()]))
        .load("animals")?;

    assert_eq!(view.class_slots("Dog", true, false)?, vec!["name"]);
    assert_eq!(view.class_slots("Dog", true, true)?, vec!["name", "owner"]);
    assert_eq!(view.slot_inherited_from("Dog", "owner")?, Some("Pet".to_string()));
    assert_eq!(
        view.all_usages_of("Person")?,
        vec![
            ("Dog".to_string(), "Person".to_string()),
            ("Pet".to_string(), "Person".to_string()),
        ]
    );
    Ok(())
}

const UNSORTED: &str = r"
name: unsorted
slots:
  zone:
    range: string
  age:
    range: integer
classes:
  Target: {}
  Zeta:
    apply_to: Target
  Alpha:
    apply_to: Target
  Zebra:
    is_a: Target
    slots: [zone, age]
    slot_usage:
      zone:
        required: true
      age:
        required: true
  Aardvark:
    is_a: Target
";

#[test]
fn test_mapping_keys_keep_document_order() -> Result<(), Box<dyn std::error::Error>> {
    let source = InMemorySource::new().with_yaml("unsorted", UNSORTED);
    let view = SchemaLoader::new(source).load("unsorted")?;

    let classes: Vec<&str> = view.all_classes().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(classes, vec!["Target", "Zeta", "Alpha", "Zebra", "Aardvark"]);
    let slots: Vec<&str> = view.all_slots().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(slots, vec!["zone", "age"]);

    let zebra = view.class_by_name("Zebra").ok_or("Zebra missing")?;
    let usages: Vec<&str> = zebra.slot_usage.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(usages, vec!["zone", "age"]);
    Ok(())
}

#[test]
fn test_apply_to_order_follows_document() -> Result<(), Box<dyn std::error::Error>> {
    let source = InMemorySource::new().with_yaml("unsorted", UNSORTED);
    let view = SchemaLoader::new(source).load("unsorted")?;

    let target = view.class_by_name("Target").ok_or("Target missing")?;
    assert_eq!(target.mixins, vec!["Zeta".to_string(), "Alpha".to_string()]);
    assert_eq!(
        view.class_ancestors("Target", AncestorQuery::all())?,
        vec!["Target", "Zeta", "Alpha"]
    );
    assert_eq!(view.direct_children("Target")?, vec!["Zebra", "Aardvark"]);
    assert_eq!(view.children_via_mixin("Zeta")?, vec!["Target"]);
    assert_eq!(view.class_slots("Zebra", true, true)?, vec!["zone", "age"]);
    Ok(())
}

#[test]
fn test_cli_prints_ancestors() -> Result<(), Box<dyn std::error::Error>> {
    let dir = animals_dir()?;
    let output = Command::new(env!("CARGO_BIN_EXE_metamodel"))
        .arg("--schema")
        .arg(dir.path().join("animals.yaml"))
        .args(["ancestors", "Dog", "--mixins"])
        .output()?;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8(output.stdout)?, "Dog\nAnimal\nPet\n");
    Ok(())
}

#[test]
fn test_cli_fails_on_missing_import() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let schema = dir.path().join("broken.yaml");
    fs::write(&schema, "name: broken\nimports: [nowhere]\n")?;

    let output = Command::new(env!("CARGO_BIN_EXE_metamodel"))
        .arg("--schema")
        .arg(&schema)
        .args(["children", "Anything"])
        .output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing-import"), "{stderr}");
    Ok(())
}
