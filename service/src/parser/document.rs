//! Best-effort schema construction and structural validation

use metamodel_core::named::Named;
use metamodel_core::types::{ClassDefinition, SchemaDefinition, SlotDefinition, TypeDefinition};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Build a schema from a document tree.
///
/// Returns the schema together with a message for every part of the tree
/// that had to be skipped.
#[must_use]
pub fn build_schema(tree: Value) -> (SchemaDefinition, Vec<String>) {
    let mut problems = Vec::new();
    let mut schema = SchemaDefinition::default();

    let mut root = match tree {
        Value::Object(root) => root,
        Value::Null => {
            problems.push("document is empty".to_string());
            return (schema, problems);
        }
        other => {
            problems.push(format!(
                "document root must be a mapping, found {}",
                kind_of(&other)
            ));
            return (schema, problems);
        }
    };

    schema.id = take_string(&mut root, "id", &mut problems).unwrap_or_default();
    schema.name = take_string(&mut root, "name", &mut problems).unwrap_or_default();
    schema.description = take_string(&mut root, "description", &mut problems);
    schema.version = take_string(&mut root, "version", &mut problems);
    schema.imports = take_imports(&mut root, &mut problems);
    schema.classes = take_elements::<ClassDefinition>(&mut root, "classes", "class", &mut problems);
    schema.slots = take_elements::<SlotDefinition>(&mut root, "slots", "slot", &mut problems);
    schema.types = take_elements::<TypeDefinition>(&mut root, "types", "type", &mut problems);

    (schema, problems)
}

/// Structural checks that do not drop any data
#[must_use]
pub fn validate_schema(schema: &SchemaDefinition) -> Vec<String> {
    let mut problems = Vec::new();

    if schema.name.trim().is_empty() {
        problems.push("schema has no name".to_string());
    }

    check_names("class", schema.classes.iter().map(|c| c.name.as_str()), &mut problems);
    check_names("slot", schema.slots.iter().map(|s| s.name.as_str()), &mut problems);
    check_names("type", schema.types.iter().map(|t| t.name.as_str()), &mut problems);

    for class in &schema.classes {
        check_edges("class", &class.name, class.is_a.as_deref(), &class.mixins, &mut problems);
        if class.apply_to.as_deref() == Some(class.name.as_str()) {
            problems.push(format!("class '{}' applies itself to itself", class.name));
        }
        check_names(
            &format!("slot_usage entry of class '{}'", class.name),
            class.slot_usage.iter().map(|u| u.name.as_str()),
            &mut problems,
        );
    }
    for slot in &schema.slots {
        check_edges("slot", &slot.name, slot.is_a.as_deref(), &slot.mixins, &mut problems);
    }

    problems
}

fn check_names<'a>(
    label: &str,
    names: impl Iterator<Item = &'a str>,
    problems: &mut Vec<String>,
) {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            problems.push(format!("{label} without a name"));
        } else if !seen.insert(name) {
            problems.push(format!("{label} '{name}' is defined more than once"));
        }
    }
}

fn check_edges(
    label: &str,
    name: &str,
    is_a: Option<&str>,
    mixins: &[String],
    problems: &mut Vec<String>,
) {
    if is_a == Some(name) {
        problems.push(format!("{label} '{name}' is_a itself"));
    }
    let mut seen = HashSet::new();
    for mixin in mixins {
        if mixin == name {
            problems.push(format!("{label} '{name}' lists itself as a mixin"));
        }
        if !seen.insert(mixin.as_str()) {
            problems.push(format!("{label} '{name}' lists mixin '{mixin}' more than once"));
        }
    }
}

fn take_string(
    root: &mut Map<String, Value>,
    key: &str,
    problems: &mut Vec<String>,
) -> Option<String> {
    match root.remove(key)? {
        Value::String(text) => Some(text),
        Value::Null => None,
        scalar @ (Value::Number(_) | Value::Bool(_)) => Some(scalar.to_string()),
        other => {
            problems.push(format!("'{key}' must be a string, found {}", kind_of(&other)));
            None
        }
    }
}

fn take_imports(root: &mut Map<String, Value>, problems: &mut Vec<String>) -> Vec<String> {
    match root.remove("imports") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(single)) => vec![single],
        Some(Value::Array(entries)) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(import) => Some(import),
                other => {
                    problems.push(format!(
                        "import entry must be a string, found {}",
                        kind_of(&other)
                    ));
                    None
                }
            })
            .collect(),
        Some(other) => {
            problems.push(format!("'imports' must be a list, found {}", kind_of(&other)));
            Vec::new()
        }
    }
}

fn take_elements<T>(
    root: &mut Map<String, Value>,
    key: &str,
    label: &str,
    problems: &mut Vec<String>,
) -> Vec<T>
where
    T: DeserializeOwned + Named + Default,
{
    let entries: Vec<(Option<String>, Value)> = match root.remove(key) {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Object(map)) => map.into_iter().map(|(k, v)| (Some(k), v)).collect(),
        Some(Value::Array(items)) => items.into_iter().map(|v| (None, v)).collect(),
        Some(other) => {
            problems.push(format!("'{key}' must be a mapping or list, found {}", kind_of(&other)));
            return Vec::new();
        }
    };

    let mut elements = Vec::with_capacity(entries.len());
    for (position, (key_name, value)) in entries.into_iter().enumerate() {
        let display = key_name
            .clone()
            .or_else(|| value.get("name").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| format!("#{position}"));

        let parsed = if value.is_null() {
            Ok(T::default())
        } else {
            serde_json::from_value::<T>(value)
        };
        match parsed {
            Ok(mut element) => {
                if let Some(name) = key_name
                    && element.name().is_empty()
                {
                    element.set_name(name);
                }
                elements.push(element);
            }
            Err(e) => problems.push(format!("{label} '{display}' skipped: {e}")),
        }
    }
    elements
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
