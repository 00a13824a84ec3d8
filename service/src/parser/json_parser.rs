//! JSON parser for metamodel schemas

use metamodel_core::error::{MetamodelError, Result};
use serde_json::Value;

use super::SchemaParser;

/// `JSON` parser implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonParser;

impl JsonParser {
    /// Create a new `JSON` parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SchemaParser for JsonParser {
    fn parse_tree(&self, content: &str) -> Result<Value> {
        serde_json::from_str(content).map_err(|e| {
            MetamodelError::parse_at(
                format!("JSON parsing error: {e}"),
                format!("line {}, column {}", e.line(), e.column()),
            )
        })
    }
}
