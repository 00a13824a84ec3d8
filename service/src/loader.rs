//! Schema loading and import merging
//!
//! Imports are loaded depth-first: an import's own imports are merged into
//! it before it is merged into the importing schema. Merging appends class,
//! slot and type definitions without deduplication. Only the root load
//! (depth 0) builds the store and applies extensions.

use metamodel_core::{
    config::MetamodelConfig,
    diagnostics::{Diagnostic, Diagnostics},
    error::{MetamodelError, Result},
    types::SchemaDefinition,
};
use std::sync::Arc;

use crate::extension::apply_extensions;
use crate::parser::Parser;
use crate::schema_view::SchemaView;
use crate::source::{FileSystemSource, ImportSource, SchemaDocument};
use crate::store::SchemaStore;

/// Loads a root schema and everything it imports
pub struct SchemaLoader {
    source: Arc<dyn ImportSource>,
    config: MetamodelConfig,
    diagnostics: Diagnostics,
}

impl std::fmt::Debug for SchemaLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SchemaLoader {
    /// Loader that fetches imports from `source`
    #[must_use]
    pub fn new(source: impl ImportSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            config: MetamodelConfig::default(),
            diagnostics: Diagnostics::default(),
        }
    }

    /// Loader that reads imports from the configured search paths
    #[must_use]
    pub fn from_config(config: MetamodelConfig) -> Self {
        Self {
            source: Arc::new(FileSystemSource::from_config(&config.imports)),
            config,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Replace the configuration, keeping the import source
    #[must_use]
    pub fn with_config(mut self, config: MetamodelConfig) -> Self {
        self.config = config;
        self
    }

    /// Report to `diagnostics` instead of the default tracing sink
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Load the root schema named `root` from the import source
    ///
    /// # Errors
    ///
    /// Returns `MissingImport` if the root or any import cannot be fetched,
    /// `ParseError` if a document is not well-formed, and `ImportCycle` or
    /// `ImportDepthExceeded` for runaway import graphs.
    pub fn load(&self, root: &str) -> Result<SchemaView> {
        let document = self.fetch(root)?;
        self.load_root(&document, root)
    }

    /// Load a root schema given as a document
    ///
    /// # Errors
    ///
    /// As for [`SchemaLoader::load`].
    pub fn load_document(&self, document: &SchemaDocument) -> Result<SchemaView> {
        self.load_root(document, &document.location)
    }

    fn load_root(&self, document: &SchemaDocument, root: &str) -> Result<SchemaView> {
        let schema = self.load_schema(document, 0, &[root.to_string()])?;

        tracing::info!(schema = %schema.name, "Applying extensions");
        let mut store = SchemaStore::from_schema(schema);
        let applied = apply_extensions(&mut store, &self.diagnostics);
        tracing::debug!(applied, "extensions applied");

        for (kind, name, count) in store.duplicates() {
            tracing::debug!(
                %kind,
                name = %name,
                count,
                "name defined more than once; first definition wins"
            );
        }

        Ok(SchemaView::from_store(store, self.diagnostics.clone()))
    }

    /// Parse one document and merge its imports into it, recursively.
    ///
    /// `import_path` is the chain of import names leading to this document,
    /// itself included.
    ///
    /// # Errors
    ///
    /// As for [`SchemaLoader::load`].
    pub fn load_schema(
        &self,
        document: &SchemaDocument,
        depth: usize,
        import_path: &[String],
    ) -> Result<SchemaDefinition> {
        tracing::info!(location = %document.location, depth, "Loading schema");
        let parser = Parser::new().with_validation(self.config.resolution.validate_documents);
        let mut schema = parser.read_document(document, &self.diagnostics)?;

        if self.config.imports.follow_imports {
            self.load_imports(&mut schema, depth, import_path)?;
        }
        Ok(schema)
    }

    fn load_imports(
        &self,
        schema: &mut SchemaDefinition,
        depth: usize,
        import_path: &[String],
    ) -> Result<()> {
        let imports = schema.imports.clone();
        for import in imports {
            if import_path.contains(&import) {
                let mut path = import_path.to_vec();
                path.push(import);
                return Err(MetamodelError::ImportCycle { path });
            }
            let max_depth = self.config.imports.max_import_depth;
            if depth + 1 > max_depth {
                return Err(MetamodelError::ImportDepthExceeded { import, max_depth });
            }

            tracing::info!(schema = %schema.name, import = %import, "Importing");
            let document = self.fetch(&import)?;
            let mut branch = import_path.to_vec();
            branch.push(import);
            let imported = self.load_schema(&document, depth + 1, &branch)?;
            Self::merge_schemas(schema, imported);
        }
        Ok(())
    }

    /// Append `source`'s classes, slots and types to `target`'s.
    ///
    /// Same-named definitions are kept side by side.
    pub fn merge_schemas(target: &mut SchemaDefinition, source: SchemaDefinition) {
        tracing::debug!(
            into = %target.name,
            from = %source.name,
            classes = source.classes.len(),
            slots = source.slots.len(),
            types = source.types.len(),
            "merging schema"
        );
        target.classes.extend(source.classes);
        target.slots.extend(source.slots);
        target.types.extend(source.types);
    }

    fn fetch(&self, import: &str) -> Result<SchemaDocument> {
        self.source.fetch(import).inspect_err(|e| {
            if let MetamodelError::MissingImport { import, reason } = e {
                self.diagnostics.emit(Diagnostic::MissingImport {
                    import: import.clone(),
                    reason: reason.clone(),
                });
            }
        })
    }
}
