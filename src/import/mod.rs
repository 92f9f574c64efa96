//! Multi-pass XMI importer.
//!
//! This module reads a MagicDraw-style XMI document into a [`ModelStore`]
//! and places the diagram contents on a [`Canvas`].
//!
//! ## Passes
//!
//! ```text
//!            ┌──────────────┐
//!  bytes ───►│ Document     │  quick-xml tree, NodeId arena
//!            └──────┬───────┘
//!                   ▼
//!            ┌──────────────┐   factories ──► Registry ──► ModelStore
//!            │ walker       │
//!            └──────┬───────┘   enqueue (node, context)
//!                   ▼
//!   cross-ref queue ──► diagram queue ──► link queue (per diagram) ──► diagram-ref queue
//!                   ▼
//!            placements ──► Canvas
//! ```
//!
//! Everything runs inside one [`MutationWindow`]. A fatal [`ImportError`]
//! unwinds out of the window and the host discards every change; non-fatal
//! findings are collected into the returned [`ImportReport`].
//!
//! ## Usage
//!
//! ```ignore
//! use mdimport::host::{RecordingCanvas, SharedModel};
//! use mdimport::import::{ImportContext, import_document};
//!
//! let model = SharedModel::new();
//! let mut canvas = RecordingCanvas::default();
//! let report = import_document(
//!     ImportContext::new(&model, &mut canvas),
//!     std::fs::read("model.xmi")?.as_slice(),
//! )?;
//! ```

pub mod diagnostics;
pub mod document;
mod diagram;
mod error;
mod factory;
pub mod kinds;
mod profile;
mod registry;
mod resolve;
mod session;
mod walker;

pub use diagnostics::{Diagnostic, ImportReport, Severity, codes};
pub use document::{Document, NodeId, Reference};
pub use error::{ImportError, ImportResult};
pub use kinds::SourceKind;

use crate::host::{Canvas, MutationWindow};
use crate::model::ModelStore;
use session::Session;

/// Where an import writes to.
pub struct ImportContext<'a, W: MutationWindow> {
    /// The host's exclusive mutation window over its model store.
    pub window: &'a W,
    /// The diagram canvas placements are handed to.
    pub canvas: &'a mut dyn Canvas,
}

impl<'a, W: MutationWindow> ImportContext<'a, W> {
    pub fn new(window: &'a W, canvas: &'a mut dyn Canvas) -> Self {
        Self { window, canvas }
    }
}

/// Import an XMI document.
///
/// The document is parsed before the mutation window opens; a document that
/// is not well-formed never touches the store.
pub fn import_document<W: MutationWindow>(
    ctx: ImportContext<'_, W>,
    input: &[u8],
) -> ImportResult<ImportReport> {
    let doc = Document::parse(input)?;
    let ImportContext { window, canvas } = ctx;
    window.with_mutation(|store| import_into(&doc, store, canvas))
}

/// Run every pass of an import against `store`.
///
/// Callers that manage their own transaction use this directly; on error the
/// store may hold a partial import.
pub fn import_into(
    doc: &Document,
    store: &mut dyn ModelStore,
    canvas: &mut dyn Canvas,
) -> ImportResult<ImportReport> {
    let mut session = Session::new(doc, store);

    walker::walk_document(&mut session)?;
    resolve::drain_cross_refs(&mut session)?;
    diagram::drain_diagrams(&mut session)?;
    diagram::drain_diagram_refs(&mut session)?;
    debug_assert!(session.queues.is_empty());

    let report = session.finish(canvas);
    tracing::info!(
        nodes = doc.len(),
        created = report.created,
        placements = report.placements,
        diagnostics = report.diagnostics.len(),
        "import finished"
    );
    Ok(report)
}
