//! Diagnostics: non-fatal import findings.
//!
//! An import that completes may still be lossy: references to kinds the
//! importer does not handle, duplicate declarations that were collapsed, and
//! so on. Each of these becomes a [`Diagnostic`] carried by the
//! [`ImportReport`].

use std::sync::Arc;

use crate::model::ElementId;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single non-fatal finding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Diagnostic code (see [`codes`]).
    pub code: &'static str,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// Identifier of the element or document node the finding concerns.
    pub element: Option<ElementId>,
}

impl Diagnostic {
    /// Create a new warning diagnostic.
    pub fn warning(code: &'static str, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            element: None,
        }
    }

    /// Create a new informational diagnostic.
    pub fn info(code: &'static str, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Info,
            code,
            message: message.into(),
            element: None,
        }
    }

    /// Attach the identifier this diagnostic is about.
    pub fn with_element(mut self, id: impl Into<ElementId>) -> Self {
        self.element = Some(id.into());
        self
    }

    /// Attach an optional identifier.
    pub fn with_element_opt(mut self, id: Option<ElementId>) -> Self {
        self.element = id;
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(id) = &self.element {
            write!(f, " ({id})")?;
        }
        Ok(())
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Diagnostic codes for import findings.
pub mod codes {
    /// A deferred reference named an identifier that is not registered.
    pub const UNRESOLVED_REFERENCE: &str = "W0101";
    /// A document node's kind is not handled at this position.
    pub const UNHANDLED_ELEMENT_KIND: &str = "W0102";
    /// A repeated declaration was collapsed into the existing one.
    pub const DUPLICATE_DECLARATION: &str = "W0103";
    /// A diagram listed itself as a nested diagram.
    pub const SELF_REFERENCE: &str = "I0104";
}

// ============================================================================
// REPORT
// ============================================================================

/// Outcome of a successful import.
#[derive(Clone, Debug, Default)]
pub struct ImportReport {
    /// Non-fatal findings, in the order they were recorded.
    pub diagnostics: Vec<Diagnostic>,
    /// Elements created in the store by this import.
    pub created: usize,
    /// Placements handed to the canvas.
    pub placements: usize,
}

impl ImportReport {
    /// True when nothing was dropped or collapsed.
    pub fn is_lossless(&self) -> bool {
        self.diagnostics
            .iter()
            .all(|d| d.severity == Severity::Info)
    }

    /// Diagnostics at warning severity or above.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity <= Severity::Warning)
    }

    /// Diagnostics with a given code.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }
}
