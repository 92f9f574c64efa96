//! # mdimport-base
//!
//! Multi-pass importer for MagicDraw-style UML XMI documents.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! host      → Mutation window, canvas, mdzip archives, ImportHost
//!   ↓
//! import    → Document tree, walker, resolution queues, profiles
//!   ↓
//! model     → Element graph and the ModelStore interface
//! ```

// ============================================================================
// MODULES (dependency order: model → import → host)
// ============================================================================

/// Model graph: ElementId, Element, ModelStore
pub mod model;

/// XMI import: walker, factories, deferred resolution, profiles
pub mod import;

/// Host collaborators: SharedModel, RecordingCanvas, ImportHost
pub mod host;

// Re-export the common entry points
pub use host::{ImportHost, RecordingCanvas, SharedModel};
pub use import::{Diagnostic, ImportError, ImportReport, Severity, import_document};
pub use model::{Element, ElementId, ElementKind, Model, ModelStore};
