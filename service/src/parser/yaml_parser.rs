//! YAML parser for metamodel schemas

use metamodel_core::error::{MetamodelError, Result};
use serde_json::Value;

use super::SchemaParser;

/// `YAML` parser implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlParser;

impl YamlParser {
    /// Create a new `YAML` parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SchemaParser for YamlParser {
    fn parse_tree(&self, content: &str) -> Result<Value> {
        serde_yaml::from_str(content).map_err(|e| {
            MetamodelError::parse_at(
                format!("YAML parsing error: {e}"),
                e.location().map_or_else(
                    || "unknown location".to_string(),
                    |l| format!("line {}, column {}", l.line(), l.column()),
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_schema() -> Result<()> {
        let yaml = r"
id: https://example.org/test
name: test_schema
imports:
  - core
";

        let parser = YamlParser::new();
        let schema = parser.parse_str(yaml)?;

        assert_eq!(schema.id, "https://example.org/test");
        assert_eq!(schema.name, "test_schema");
        assert_eq!(schema.imports, vec!["core".to_string()]);
        Ok(())
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let parser = YamlParser::new();
        let result = parser.parse_tree("classes: [unclosed\n");
        assert!(matches!(result, Err(MetamodelError::ParseError { .. })));
    }
}
