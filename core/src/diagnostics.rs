//! Diagnostics channel for schema loading and resolution
//!
//! The engine never prints. Recoverable findings (unresolved references,
//! document validation problems) and fatal conditions (cycles, missing
//! imports) are emitted to a [`DiagnosticSink`] chosen by the host. Fatal
//! conditions are additionally returned to the caller as
//! [`MetamodelError`](crate::error::MetamodelError) values.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::ElementKind;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Recorded, resolution continues
    Warning,
    /// The operation that produced it was aborted
    Fatal,
}

/// A structured finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A class or slot name did not resolve
    UnresolvedReference {
        /// Kind that was looked up
        kind: ElementKind,
        /// Name that was looked up
        name: String,
        /// Class context of a slot lookup
        context: Option<String>,
    },

    /// A schema document failed structural validation
    ValidationError {
        /// Document the problem was found in
        source: String,
        /// What was wrong
        message: String,
    },

    /// Ancestor or attribute traversal ran into a cycle
    CycleDetected {
        /// Kind of node the cycle runs through
        kind: ElementKind,
        /// Path ending at the revisited node
        path: Vec<String>,
    },

    /// An import could not be loaded
    MissingImport {
        /// Import that failed
        import: String,
        /// Reason for failure
        reason: String,
    },
}

impl Diagnostic {
    /// Severity of this diagnostic
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnresolvedReference { .. } | Self::ValidationError { .. } => Severity::Warning,
            Self::CycleDetected { .. } | Self::MissingImport { .. } => Severity::Fatal,
        }
    }

    /// Stable machine-readable code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnresolvedReference { .. } => "unresolved-reference",
            Self::ValidationError { .. } => "validation-error",
            Self::CycleDetected { .. } => "cycle-detected",
            Self::MissingImport { .. } => "missing-import",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedReference {
                kind,
                name,
                context: Some(context),
            } => write!(f, "No such {kind}: {name} from class {context}"),
            Self::UnresolvedReference { kind, name, .. } => write!(f, "No such {kind}: {name}"),
            Self::ValidationError { source, message } => write!(f, "{source}: {message}"),
            Self::CycleDetected { kind, path } => {
                write!(f, "Cycle in {kind} hierarchy: {}", path.join(" -> "))
            }
            Self::MissingImport { import, reason } => {
                write!(f, "Cannot import '{import}': {reason}")
            }
        }
    }
}

/// Receiver of diagnostics
pub trait DiagnosticSink: Send + Sync {
    /// Accept one diagnostic
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Sink that forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        match diagnostic.severity() {
            Severity::Warning => {
                tracing::warn!(code = diagnostic.code(), "{diagnostic}");
            }
            Severity::Fatal => {
                tracing::error!(code = diagnostic.code(), "{diagnostic}");
            }
        }
    }
}

/// Sink that buffers diagnostics for later inspection
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything emitted so far
    #[must_use]
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Diagnostics with the given code
    #[must_use]
    pub fn with_code(&self, code: &str) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .iter()
            .filter(|d| d.code() == code)
            .cloned()
            .collect()
    }

    /// Number of diagnostics emitted so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been emitted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        self.entries.lock().push(diagnostic.clone());
    }
}

/// Diagnostics context for one schema load and the queries run against it.
///
/// Owns the sink and the set of names already reported as unresolved, so
/// each missing name is reported at most once per context.
#[derive(Clone)]
pub struct Diagnostics {
    sink: Arc<dyn DiagnosticSink>,
    warned: Arc<Mutex<HashSet<(ElementKind, String)>>>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("warned", &self.warned.lock().len())
            .finish_non_exhaustive()
    }
}

impl Diagnostics {
    /// Create a context that reports to `sink`
    #[must_use]
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            sink,
            warned: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Emit a diagnostic unconditionally
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.sink.emit(&diagnostic);
    }

    /// Report an unresolved name, once per distinct `(kind, name)`
    pub fn warn_unresolved(&self, kind: ElementKind, name: &str, context: Option<&str>) {
        let first = self.warned.lock().insert((kind, name.to_string()));
        if first {
            self.emit(Diagnostic::UnresolvedReference {
                kind,
                name: name.to_string(),
                context: context.map(str::to_string),
            });
        }
    }

    /// Report a document validation problem
    pub fn validation_error(&self, source: &str, message: impl Into<String>) {
        self.emit(Diagnostic::ValidationError {
            source: source.to_string(),
            message: message.into(),
        });
    }

    /// Names reported as unresolved so far
    #[must_use]
    pub fn unresolved_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .warned
            .lock()
            .iter()
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }
}
