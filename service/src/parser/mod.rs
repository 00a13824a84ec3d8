//! Schema parsing module
//!
//! Documents are first read into a generic tree by a format-specific
//! [`SchemaParser`]. [`Parser::read_document`] then builds the schema
//! element by element, so one malformed definition is reported and skipped
//! instead of failing the whole document.

use metamodel_core::{
    diagnostics::Diagnostics,
    error::{MetamodelError, Result},
    types::SchemaDefinition,
};
use serde_json::Value;

use crate::source::{DocumentFormat, SchemaDocument};

pub mod document;
pub mod json_parser;
pub mod yaml_parser;

pub use json_parser::JsonParser;
pub use yaml_parser::YamlParser;

/// Trait for schema parsers
pub trait SchemaParser: Send + Sync {
    /// Parse text into a generic document tree
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the content is not well-formed.
    fn parse_tree(&self, content: &str) -> Result<Value>;

    /// Parse text straight into a schema, failing on any malformed element
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the content is not well-formed or does not
    /// fit the schema model.
    fn parse_str(&self, content: &str) -> Result<SchemaDefinition> {
        let tree = self.parse_tree(content)?;
        serde_json::from_value(tree)
            .map_err(|e| MetamodelError::parse(format!("schema structure error: {e}")))
    }
}

/// Main parser that delegates to format-specific parsers
#[derive(Debug, Clone, Copy)]
pub struct Parser {
    yaml: YamlParser,
    json: JsonParser,
    validate: bool,
}

impl Parser {
    /// Create a parser that reports validation findings
    #[must_use]
    pub const fn new() -> Self {
        Self {
            yaml: YamlParser::new(),
            json: JsonParser::new(),
            validate: true,
        }
    }

    /// Set whether structural validation findings are reported
    #[must_use]
    pub const fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Parser for a document format
    #[must_use]
    pub fn for_format(&self, format: DocumentFormat) -> &dyn SchemaParser {
        match format {
            DocumentFormat::Yaml => &self.yaml,
            DocumentFormat::Json => &self.json,
        }
    }

    /// Read a document into a schema, best effort.
    ///
    /// Elements that do not fit the model are dropped and reported as
    /// validation errors; structural problems are reported without
    /// dropping anything.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` only when the document is not well-formed.
    pub fn read_document(
        &self,
        document: &SchemaDocument,
        diagnostics: &Diagnostics,
    ) -> Result<SchemaDefinition> {
        let tree = self
            .for_format(document.format)
            .parse_tree(&document.content)
            .map_err(|e| match e {
                MetamodelError::ParseError { message, location } => MetamodelError::ParseError {
                    message: format!("{message} in {}", document.location),
                    location,
                },
                other => other,
            })?;

        let (schema, mut problems) = document::build_schema(tree);
        if self.validate {
            problems.extend(document::validate_schema(&schema));
        }
        for problem in problems {
            diagnostics.validation_error(&document.location, problem);
        }
        Ok(schema)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
